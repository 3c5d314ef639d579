//! Mamemaki entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::convert::FromWasmAbi;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        AddEventListenerOptions, Document, Element, EventTarget, HtmlElement, PointerEvent,
        TouchEvent,
    };

    use mamemaki::Settings;
    use mamemaki::audio::WebAudioSink;
    use mamemaki::consts::*;
    use mamemaki::game::{GameEvent, ProjectileHandle, Rect, Session, format_count};
    use mamemaki::platform::{
        InputAdapter, LifecycleSignal, PointerKind, RawContact, RawPhase, RawSource,
    };

    /// DOM side of the game
    struct View {
        document: Document,
        oni: Option<HtmlElement>,
        counter: Option<HtmlElement>,
        congrats: Option<Element>,
        /// One element per pool slot
        beans: Vec<HtmlElement>,
        /// Bean currently drawn in each slot
        live: Vec<Option<ProjectileHandle>>,
        popups: HashMap<u32, Element>,
    }

    impl View {
        fn new(document: Document, pool_capacity: usize) -> Self {
            let find = |id: &str| {
                document
                    .get_element_by_id(id)
                    .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            };
            let oni = find("oni");
            let counter = find("hit-counter");
            let congrats = document.get_element_by_id("congrats");
            if oni.is_none() {
                log::warn!("No #oni element - target will be invisible");
            }

            // Bean pool elements are created once and reused
            let body = document.body();
            let beans: Vec<HtmlElement> = (0..pool_capacity)
                .filter_map(|_| {
                    let el = document.create_element("div").ok()?;
                    el.set_class_name("bean");
                    let el: HtmlElement = el.dyn_into().ok()?;
                    let _ = el.style().set_property("display", "none");
                    if let Some(body) = &body {
                        let _ = body.append_child(&el);
                    }
                    Some(el)
                })
                .collect();

            Self {
                document,
                oni,
                counter,
                congrats,
                live: vec![None; beans.len()],
                beans,
                popups: HashMap::new(),
            }
        }

        fn apply(&mut self, event: &GameEvent) {
            match event {
                GameEvent::TargetPlaced { rect } => self.show_oni(rect),
                GameEvent::Spawned { handle, .. } => {
                    if let Some(bean) = self.beans.get(handle.slot) {
                        let _ = bean.style().set_property("display", "block");
                        self.live[handle.slot] = Some(*handle);
                    }
                }
                GameEvent::Landed { handle } => {
                    if self.live.get(handle.slot) == Some(&Some(*handle)) {
                        self.live[handle.slot] = None;
                        let _ = self.beans[handle.slot].style().set_property("display", "none");
                    }
                }
                // The following Spawned takes the slot over
                GameEvent::Cancelled { .. } | GameEvent::Hit { .. } => {}
                GameEvent::CounterChanged { value } => {
                    if let Some(counter) = &self.counter {
                        counter.set_text_content(Some(&format_count(*value)));
                        // Restart the pop animation
                        let classes = counter.class_list();
                        let _ = classes.remove_1("pop");
                        let _ = counter.offset_width();
                        let _ = classes.add_1("pop");
                    }
                }
                GameEvent::ReachedMax => {
                    if let Some(el) = &self.congrats {
                        let _ = el.class_list().add_1("show");
                    }
                }
                GameEvent::PopupShown { id, text, pos } => self.show_popup(*id, text, *pos),
                GameEvent::PopupExpired { id } => {
                    if let Some(el) = self.popups.remove(id) {
                        el.remove();
                    }
                }
                GameEvent::MoodChanged(mood) => {
                    if let Some(oni) = &self.oni {
                        let classes = oni.class_list();
                        let _ = classes.remove_2("idle", "hurt");
                        let _ = classes.add_1(mood.as_class());
                    }
                }
            }
        }

        fn show_oni(&self, rect: &Rect) {
            let Some(oni) = &self.oni else { return };
            let _ = oni.class_list().remove_1("hidden");
            let style = oni.style();
            let _ = style.set_property("left", &format!("{}px", rect.x));
            let _ = style.set_property("top", &format!("{}px", rect.y));
            let _ = style.set_property("width", &format!("{}px", rect.w));
            let _ = style.set_property("height", &format!("{}px", rect.h));
        }

        fn show_popup(&mut self, id: u32, text: &str, pos: Vec2) {
            let Ok(el) = self.document.create_element("div") else { return };
            el.set_class_name("hit-text");
            el.set_text_content(Some(text));
            if let Some(html) = el.dyn_ref::<HtmlElement>() {
                let style = html.style();
                let _ = style.set_property("left", &format!("{}px", pos.x));
                let _ = style.set_property("top", &format!("{}px", pos.y));
            }
            if let Some(body) = self.document.body() {
                let _ = body.append_child(&el);
            }
            self.popups.insert(id, el);
        }

        /// Move every flying bean to its pose for this frame
        fn render_beans(&mut self, session: &Session<WebAudioSink>, now: f64) {
            for (slot, live) in self.live.iter_mut().enumerate() {
                let Some(handle) = *live else { continue };
                let bean = &self.beans[slot];
                match session.bean_pose(handle, now) {
                    Some(pose) => {
                        let half = BEAN_SIZE / 2.0;
                        let transform = format!(
                            "translate({}px, {}px) scale({})",
                            pose.pos.x - half,
                            pose.pos.y - half,
                            pose.scale
                        );
                        let _ = bean.style().set_property("transform", &transform);
                    }
                    None => {
                        // Landed or reclaimed without us seeing the event
                        *live = None;
                        let _ = bean.style().set_property("display", "none");
                    }
                }
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        session: Session<WebAudioSink>,
        input: InputAdapter,
        view: View,
    }

    impl Game {
        fn contact(&mut self, raw: RawContact) {
            if let Some(contact) = self.input.translate(raw) {
                self.session.handle_contact(contact, now());
            }
        }

        fn lifecycle(&mut self, signal: LifecycleSignal) {
            log::info!("Lifecycle: {signal:?}");
            if signal.interrupts_contact() {
                self.input.reset();
            }
            self.session.handle_lifecycle(signal);
        }

        fn frame(&mut self, time: f64) {
            self.session.tick(time);
            let Game { session, view, .. } = self;
            for event in session.drain_events() {
                view.apply(&event);
            }
            view.render_beans(session, time);
        }
    }

    /// Same clock as `requestAnimationFrame` timestamps
    fn now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    fn viewport(window: &web_sys::Window) -> Vec2 {
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Vec2::new(w as f32, h as f32)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Mamemaki starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let settings = Settings::load();
        let audio = WebAudioSink::new(settings.volume, settings.muted);
        let seed = js_sys::Date::now() as u64;
        let session = Session::new(&settings, viewport(&window), audio, seed);
        let view = View::new(document.clone(), settings.pool_capacity);

        let game = Rc::new(RefCell::new(Game {
            session,
            input: InputAdapter::new(),
            view,
        }));

        setup_input_handlers(&document, game.clone());
        setup_lifecycle_handlers(&window, &document, game.clone());

        // Start frame loop
        request_animation_frame(game);

        log::info!("Mamemaki running!");
    }

    /// Register a non-passive listener so handlers may call `preventDefault`
    fn listen<E>(target: &EventTarget, name: &str, handler: impl FnMut(E) + 'static)
    where
        E: FromWasmAbi + 'static,
    {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        let _ = target.add_event_listener_with_callback_and_add_event_listener_options(
            name,
            closure.as_ref().unchecked_ref(),
            &options,
        );
        closure.forget();
    }

    fn setup_input_handlers(document: &Document, game: Rc<RefCell<Game>>) {
        // Long-press menu would steal the hold
        listen(document, "contextmenu", |event: web_sys::Event| {
            event.prevent_default();
        });

        for (name, phase) in [
            ("touchstart", RawPhase::Down),
            ("touchmove", RawPhase::Move),
            ("touchend", RawPhase::Up),
            ("touchcancel", RawPhase::Cancel),
        ] {
            let game = game.clone();
            listen(document, name, move |event: TouchEvent| {
                event.prevent_default();
                let touches = event.changed_touches();
                let mut game = game.borrow_mut();
                for touch in (0..touches.length()).filter_map(|i| touches.get(i)) {
                    game.contact(RawContact {
                        source: RawSource::Touch {
                            id: touch.identifier(),
                        },
                        phase,
                        point: Vec2::new(touch.client_x() as f32, touch.client_y() as f32),
                    });
                }
            });
        }

        // Mouse/pen fallback
        for (name, phase) in [
            ("pointerdown", RawPhase::Down),
            ("pointermove", RawPhase::Move),
            ("pointerup", RawPhase::Up),
            ("pointercancel", RawPhase::Cancel),
            ("pointerleave", RawPhase::Leave),
        ] {
            let game = game.clone();
            listen(document, name, move |event: PointerEvent| {
                let kind = PointerKind::from_str(&event.pointer_type());
                // Keep text selection and drag from taking over a mouse/pen hold
                if phase == RawPhase::Down && kind != PointerKind::Touch {
                    event.prevent_default();
                }
                game.borrow_mut().contact(RawContact {
                    source: RawSource::Pointer {
                        id: event.pointer_id(),
                        primary: event.is_primary(),
                        kind,
                    },
                    phase,
                    point: Vec2::new(event.client_x() as f32, event.client_y() as f32),
                });
            });
        }
    }

    fn setup_lifecycle_handlers(
        window: &web_sys::Window,
        document: &Document,
        game: Rc<RefCell<Game>>,
    ) {
        // Visibility change (tab switch, app switch, lock screen)
        {
            let game = game.clone();
            let document_clone = document.clone();
            listen(document, "visibilitychange", move |_event: web_sys::Event| {
                let signal = if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    LifecycleSignal::Hidden
                } else {
                    LifecycleSignal::Visible
                };
                game.borrow_mut().lifecycle(signal);
            });
        }

        for (name, signal) in [
            ("pagehide", LifecycleSignal::PageHide),
            ("blur", LifecycleSignal::Blur),
            ("focus", LifecycleSignal::Focus),
        ] {
            let game = game.clone();
            listen(window, name, move |_event: web_sys::Event| {
                game.borrow_mut().lifecycle(signal);
            });
        }

        // Rotation / resize
        {
            let window_clone = window.clone();
            listen(window, "resize", move |_event: web_sys::Event| {
                let size = viewport(&window_clone);
                game.borrow_mut().session.resize(size.x, size.y);
            });
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Mamemaki (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    println!("\nRunning headless hold-to-fire demo...");
    demo_hold();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Hold on the oni for one second at 60 fps and report what happened
#[cfg(not(target_arch = "wasm32"))]
fn demo_hold() {
    use glam::Vec2;
    use mamemaki::game::{Contact, GameEvent, PlacementMode, Session};
    use mamemaki::{NullSink, Settings};

    let settings = Settings {
        placement: PlacementMode::Fixed,
        ..Default::default()
    };
    let mut session = Session::new(&settings, Vec2::new(390.0, 844.0), NullSink, 2024);
    let Some(aim) = session.target().rect().map(|r| r.center()) else {
        println!("Oni not placed");
        return;
    };

    let frame = 1000.0 / 60.0;
    let mut spawned = 0;
    let mut popups = 0;
    session.handle_contact(Contact::Start(aim), 0.0);
    for i in 1..=90 {
        let t = i as f64 * frame;
        if i == 60 {
            session.handle_contact(Contact::End, t);
        }
        session.tick(t);
        for event in session.drain_events() {
            match event {
                GameEvent::Spawned { .. } => spawned += 1,
                GameEvent::PopupShown { text, .. } => {
                    popups += 1;
                    log::info!("{text}");
                }
                _ => {}
            }
        }
    }

    println!(
        "✓ {} beans thrown, {} hits, {} exclamations",
        spawned,
        session.counter().count(),
        popups
    );
}
