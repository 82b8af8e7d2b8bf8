//! Browser platform layer
//!
//! Wires keyboard input, the requestAnimationFrame loop, and the DOM HUD to
//! the [`App`] shell. Drawing the playfield itself is handled by the page's
//! canvas renderer reading the exported state; this module owns everything
//! else the browser build needs.

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

use crate::App;
use crate::audio::WebAudio;
use crate::persistence::LocalStorageScores;
use crate::settings::Settings;
use crate::sim::GamePhase;

struct Shell {
    app: App,
    last_time: f64,
}

#[wasm_bindgen(start)]
pub fn start() {
    run();
}

pub fn run() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

    log::info!("Attack of the S-Corp starting...");

    let seed = js_sys::Date::now() as u64;
    let app = App::new(
        seed,
        Box::new(WebAudio::new()),
        Box::new(LocalStorageScores::load()),
        Settings::load(),
    );

    let shell = Rc::new(RefCell::new(Shell {
        app,
        last_time: 0.0,
    }));

    setup_keyboard(shell.clone());
    setup_auto_pause(shell.clone());
    request_animation_frame(shell);

    log::info!("Attack of the S-Corp running!");
}

fn setup_keyboard(shell: Rc<RefCell<Shell>>) {
    let window = web_sys::window().expect("no window");

    {
        let shell = shell.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let mut s = shell.borrow_mut();
            match event.key().as_str() {
                "ArrowLeft" | "a" | "A" => s.app.input.left = true,
                "ArrowRight" | "d" | "D" => s.app.input.right = true,
                " " => s.app.input.fire = true,
                "Enter" => s.app.input.start_pressed = true,
                "Escape" | "p" | "P" => s.app.input.pause_pressed = true,
                "q" | "Q" => s.app.input.quit_pressed = true,
                _ => {}
            }
        });
        let _ =
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let mut s = shell.borrow_mut();
            match event.key().as_str() {
                "ArrowLeft" | "a" | "A" => s.app.input.left = false,
                "ArrowRight" | "d" | "D" => s.app.input.right = false,
                " " => s.app.input.fire = false,
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

fn setup_auto_pause(shell: Rc<RefCell<Shell>>) {
    let window = web_sys::window().expect("no window");
    let document = window.document().expect("no document");

    // Tab hidden
    {
        let shell = shell.clone();
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                shell.borrow_mut().app.request_pause();
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Window blur/focus
    {
        let shell = shell.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut s = shell.borrow_mut();
            s.app.request_pause();
            if s.app.settings.mute_on_blur {
                s.app.set_muted(true);
            }
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }
    {
        let window2 = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut s = shell.borrow_mut();
            if s.app.settings.mute_on_blur {
                s.app.set_muted(false);
            }
        });
        let _ = window2.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

fn request_animation_frame(shell: Rc<RefCell<Shell>>) {
    let window = web_sys::window().expect("no window");
    let closure = Closure::once(move |time: f64| {
        frame(shell, time);
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

fn frame(shell: Rc<RefCell<Shell>>, time: f64) {
    {
        let mut s = shell.borrow_mut();

        let elapsed = if s.last_time > 0.0 {
            ((time - s.last_time) / 1000.0) as f32
        } else {
            crate::consts::TICK_DT
        };
        s.last_time = time;

        s.app.advance(elapsed, time / 1000.0);
        update_hud(&s.app);
    }

    request_animation_frame(shell);
}

/// Push score/wave/resource readouts and phase overlays into the DOM
fn update_hud(app: &App) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    let set = |id: &str, text: &str| {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    };

    set("hud-score", &app.state.score.to_string());
    set("hud-high-score", &app.state.high_score.to_string());
    set("hud-wave", &(app.state.wave + 1).to_string());
    set("hud-pink-slips", &app.state.pink_slips.to_string());
    set("hud-parents", &app.state.parent_sets_remaining.to_string());

    let overlay = |id: &str, phase: GamePhase| {
        if let Some(el) = document.get_element_by_id(id) {
            let class = if app.state.phase == phase {
                "overlay"
            } else {
                "overlay hidden"
            };
            let _ = el.set_attribute("class", class);
        }
    };
    overlay("title-screen", GamePhase::Title);
    overlay("pause-menu", GamePhase::Paused);
    overlay("game-over", GamePhase::GameOver);
    overlay("victory", GamePhase::Victory);
}
