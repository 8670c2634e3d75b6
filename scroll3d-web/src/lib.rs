/// scroll3d Web - browser host for the scroll-driven model showcase
///
/// Wires the engine to the DOM: scroll/resize listeners, an
/// `IntersectionObserver` over the section panels, a `<model-viewer>`-style
/// element as the display surface, and `setTimeout`/`requestAnimationFrame`
/// for the engine's timers.
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Element, Event, EventTarget, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, Window,
};

use scroll3d_core::{IntersectionEntry, ModelEvent, ModelSurface, ResourceLoadError, ShowcaseEngine};

pub mod config;
pub mod dom;

use config::WebConfig;
use dom::{query_all, query_one, DomLayout, DomSurface};

struct Host {
    window: Window,
    engine: ShowcaseEngine,
    layout: DomLayout,
    surface: DomSurface,
    /// Handle of the pending wake-up timeout
    timeout: Option<i32>,
    wake: Option<Closure<dyn FnMut()>>,
    frame: Option<Closure<dyn FnMut(f64)>>,
}

type SharedHost = Rc<RefCell<Host>>;

fn now_of(window: &Window) -> Duration {
    let ms = window.performance().map(|p| p.now()).unwrap_or(0.0);
    Duration::from_secs_f64(ms.max(0.0) / 1000.0)
}

fn js_error(message: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&message.to_string())
}

/// Run everything that is due, request a frame if the debounce fired, and
/// re-arm the wake-up timeout
fn pump(host: &SharedHost) {
    let mut guard = host.borrow_mut();
    let h = &mut *guard;
    let now = now_of(&h.window);
    h.engine.advance(now, &h.layout, &mut h.surface);

    if h.engine.poll_dispatch(now) {
        if let Some(frame) = &h.frame {
            if let Err(err) = h.window.request_animation_frame(frame.as_ref().unchecked_ref()) {
                log::warn!("requestAnimationFrame failed: {:?}", err);
            }
        }
    }
    schedule_wakeup(h);
}

fn run_frame(host: &SharedHost) {
    let mut guard = host.borrow_mut();
    let h = &mut *guard;
    let now = now_of(&h.window);
    h.engine.animation_frame(now, &h.layout, &mut h.surface);
    schedule_wakeup(h);
}

fn schedule_wakeup(h: &mut Host) {
    if let Some(handle) = h.timeout.take() {
        h.window.clear_timeout_with_handle(handle);
    }
    let (Some(at), Some(wake)) = (h.engine.next_wakeup(), &h.wake) else {
        return;
    };
    let delay = at.saturating_sub(now_of(&h.window));
    let delay_ms = (delay.as_secs_f64() * 1000.0).ceil() as i32;
    let scheduled = h
        .window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            wake.as_ref().unchecked_ref(),
            delay_ms,
        );
    match scheduled {
        Ok(handle) => h.timeout = Some(handle),
        Err(err) => log::warn!("setTimeout failed: {:?}", err),
    }
}

fn listen(
    target: &EventTarget,
    event: &str,
    passive: bool,
    callback: Closure<dyn FnMut(Event)>,
) -> Result<(), JsValue> {
    let options = AddEventListenerOptions::new();
    options.set_passive(passive);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        callback.as_ref().unchecked_ref(),
        &options,
    )?;
    // Listeners stay registered for the lifetime of the page
    callback.forget();
    Ok(())
}

fn install_listeners(host: &SharedHost, config: &WebConfig) -> Result<(), JsValue> {
    let (window, model, sections) = {
        let h = host.borrow();
        (h.window.clone(), h.surface.model().clone(), h.layout.sections().to_vec())
    };

    for event in ["scroll", "resize"] {
        let host = host.clone();
        let on_scroll = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            {
                let mut h = host.borrow_mut();
                let now = now_of(&h.window);
                h.engine.scroll_event(now);
            }
            pump(&host);
        });
        listen(&window, event, true, on_scroll)?;
    }

    let on_load = {
        let host = host.clone();
        Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            let mut guard = host.borrow_mut();
            let h = &mut *guard;
            let source = h.surface.loaded_source().unwrap_or_default();
            h.engine.model_event(&ModelEvent::Loaded { source }, &mut h.surface);
        })
    };
    listen(&model, "load", false, on_load)?;

    let on_error = {
        let host = host.clone();
        Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let mut guard = host.borrow_mut();
            let h = &mut *guard;
            let failure = ResourceLoadError {
                source_ref: h.surface.loaded_source().unwrap_or_default(),
                reason: format!("viewer reported `{}`", event.type_()),
            };
            h.engine.model_event(&ModelEvent::Failed(failure), &mut h.surface);
        })
    };
    listen(&model, "error", false, on_error)?;

    let on_intersect = {
        let host = host.clone();
        Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                {
                    let mut h = host.borrow_mut();
                    let batch: Vec<IntersectionEntry> = entries
                        .iter()
                        .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
                        .filter_map(|entry| {
                            let target: JsValue = entry.target().into();
                            h.layout.index_of(&target).map(|index| IntersectionEntry {
                                index,
                                ratio: entry.intersection_ratio(),
                            })
                        })
                        .collect();
                    h.engine.intersections(&batch);
                }
                pump(&host);
            },
        )
    };

    let thresholds = js_sys::Array::new();
    for t in &config.observer.thresholds {
        thresholds.push(&JsValue::from_f64(*t));
    }
    let init = IntersectionObserverInit::new();
    init.set_root_margin(&config.root_margin());
    init.set_threshold(&thresholds);
    let observer =
        IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &init)?;
    for section in &sections {
        observer.observe(section);
    }
    on_intersect.forget();

    Ok(())
}

fn install_timers(host: &SharedHost) {
    let wake = {
        let host = host.clone();
        Closure::<dyn FnMut()>::new(move || {
            host.borrow_mut().timeout = None;
            pump(&host);
        })
    };
    let frame = {
        let host = host.clone();
        Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| run_frame(&host))
    };
    let mut h = host.borrow_mut();
    h.wake = Some(wake);
    h.frame = Some(frame);
}

fn arm_startup(host: &SharedHost) -> Result<(), JsValue> {
    let window = host.borrow().window.clone();
    let ready = window
        .document()
        .map(|d| d.ready_state() == "complete")
        .unwrap_or(false);

    if ready {
        let mut h = host.borrow_mut();
        let now = now_of(&h.window);
        h.engine.page_ready(now);
    } else {
        let host = host.clone();
        let on_ready = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            {
                let mut h = host.borrow_mut();
                let now = now_of(&h.window);
                h.engine.page_ready(now);
            }
            pump(&host);
        });
        listen(&window, "load", false, on_ready)?;
    }
    Ok(())
}

/// Handle returned to the page; also the debug surface
#[wasm_bindgen]
pub struct ScrollShowcase {
    host: SharedHost,
}

#[wasm_bindgen]
impl ScrollShowcase {
    /// Attach to the page. `config_json` may be empty for the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<ScrollShowcase, JsValue> {
        let config = WebConfig::from_json(config_json)
            .map_err(|e| js_error(format!("invalid config: {e}")))?;
        // A second showcase on the same page keeps the logger already installed
        console_log::init_with_level(config.log_level()).ok();

        let window = web_sys::window().ok_or_else(|| js_error("no global window"))?;
        let document = window.document().ok_or_else(|| js_error("no document"))?;

        let model: HtmlElement = query_one(&document, &config.model_selector)?;
        let container: Element = query_one(&document, &config.container_selector)?;
        let sections = query_all(&document, &config.section_selector)?;
        if sections.is_empty() {
            return Err(js_error(format!("no sections match {}", config.section_selector)));
        }
        log::info!("found {} sections", sections.len());

        let regions = sections
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let id = s.id();
                if id.is_empty() {
                    format!("section-{}", i + 1)
                } else {
                    id
                }
            })
            .collect();
        let engine = ShowcaseEngine::new(&config.showcase(regions)).map_err(|e| {
            log::error!("showcase not started: {}", e);
            js_error(e)
        })?;

        let host = Rc::new(RefCell::new(Host {
            window: window.clone(),
            engine,
            layout: DomLayout::new(window, container, sections.clone()),
            surface: DomSurface::new(
                model,
                sections,
                config.active_class.clone(),
                config.loaded_class.clone(),
            ),
            timeout: None,
            wake: None,
            frame: None,
        }));

        install_timers(&host);
        install_listeners(&host, &config)?;
        arm_startup(&host)?;
        pump(&host);

        Ok(ScrollShowcase { host })
    }

    /// Committed section index, or -1 before the first activation
    #[wasm_bindgen(js_name = getCurrentIndex)]
    pub fn current_index(&self) -> i32 {
        self.host
            .borrow()
            .engine
            .current_index()
            .map(|i| i as i32)
            .unwrap_or(-1)
    }

    /// Manually activate a section. Returns whether a transition started.
    #[wasm_bindgen(js_name = testSection)]
    pub fn test_section(&self, index: i32) -> bool {
        let started = {
            let mut guard = self.host.borrow_mut();
            let h = &mut *guard;
            let now = now_of(&h.window);
            h.engine
                .inspector()
                .activate(index as i64, now, &mut h.surface)
                .is_started()
        };
        pump(&self.host);
        started
    }

    /// Scroll progress through the section container, 0 to 1
    #[wasm_bindgen(js_name = getScrollProgress)]
    pub fn scroll_progress(&self) -> f64 {
        let mut guard = self.host.borrow_mut();
        let h = &mut *guard;
        let progress = h.engine.inspector().scroll_progress(&h.layout);
        log::info!("scroll progress: {}", scroll3d_core::debug::format_progress(progress));
        progress
    }

    /// One line per section with its current geometry
    #[wasm_bindgen(js_name = showSectionPositions)]
    pub fn section_positions(&self) -> js_sys::Array {
        let mut guard = self.host.borrow_mut();
        let h = &mut *guard;
        let lines = js_sys::Array::new();
        for position in h.engine.inspector().section_positions(&h.layout) {
            log::info!("{}", position);
            lines.push(&JsValue::from_str(&position.to_string()));
        }
        lines
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Setup panic hook for better error messages in browser console
    console_error_panic_hook::set_once();
    Ok(())
}
