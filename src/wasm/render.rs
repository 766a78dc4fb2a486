use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

use super::canvas::{describe, CanvasSurface};
use crate::config::RainConfig;
use crate::rain::RainEngine;

/// Attribute on the canvas holding a JSON object of [`RainConfig`] overrides.
pub const CONFIG_ATTRIBUTE: &str = "data-rain-config";

type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

thread_local! {
    static ACTIVE: RefCell<Option<RainDriver>> = const { RefCell::new(None) };
}

struct Rain {
    engine: RainEngine,
    surface: CanvasSurface,
    window: Window,
    frame_id: Option<i32>,
}

fn now(window: &Window) -> f64 {
    window.performance().map(|p| p.now()).unwrap_or_else(js_sys::Date::now)
}

impl Rain {
    fn schedule(&mut self, frame: &FrameSlot) {
        if self.frame_id.is_some() {
            return;
        }
        if let Some(cb) = frame.borrow().as_ref() {
            match self.window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                Ok(id) => self.frame_id = Some(id),
                Err(e) => log::error!("rain: requestAnimationFrame failed: {}", describe(&e)),
            }
        }
    }

    fn cancel(&mut self) {
        if let Some(id) = self.frame_id.take() {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                log::warn!("rain: cancelAnimationFrame failed: {}", describe(&e));
            }
        }
    }

    fn resize(&mut self) {
        let viewport = self.surface.viewport(&self.window);
        let Rain { engine, surface, .. } = self;
        if let Err(err) = engine.resize(&viewport, surface) {
            log::warn!("rain: resize failed: {err}");
        }
    }
}

/// Handle to the running rain canvas; cheap to clone.
#[derive(Clone)]
pub struct RainDriver {
    rain: Rc<RefCell<Rain>>,
    frame: FrameSlot,
}

impl RainDriver {
    pub fn start(&self) {
        let mut rain = self.rain.borrow_mut();
        if rain.engine.start() {
            rain.schedule(&self.frame);
        }
    }

    pub fn stop(&self) {
        let mut rain = self.rain.borrow_mut();
        rain.engine.stop();
        rain.cancel();
    }

    fn pause(&self) {
        let mut rain = self.rain.borrow_mut();
        rain.engine.pause();
        rain.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.rain.borrow().engine.is_running()
    }

    fn install_frame_callback(&self) {
        let rain = self.rain.clone();
        let frame = self.frame.clone();
        *self.frame.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            let mut rain = rain.borrow_mut();
            rain.frame_id = None;
            let now = now(&rain.window);
            let viewport = rain.surface.viewport(&rain.window);
            let Rain { engine, surface, .. } = &mut *rain;
            if engine.tick(now, &viewport, surface).reschedule() {
                rain.schedule(&frame);
            }
        }) as Box<dyn FnMut()>));
    }

    fn install_listeners(&self, window: &Window, document: &Document) -> Result<(), JsValue> {
        let resize = {
            let rain = self.rain.clone();
            Closure::wrap(Box::new(move || rain.borrow_mut().resize()) as Box<dyn FnMut()>)
        };
        window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())?;
        resize.forget();

        let visibility = {
            let driver = self.clone();
            let document = document.clone();
            Closure::wrap(Box::new(move || {
                if document.hidden() {
                    driver.pause();
                } else {
                    driver.start();
                }
            }) as Box<dyn FnMut()>)
        };
        document.add_event_listener_with_callback("visibilitychange", visibility.as_ref().unchecked_ref())?;
        visibility.forget();
        Ok(())
    }
}

fn config_overrides(canvas: &HtmlCanvasElement, fallback: RainConfig) -> RainConfig {
    let Some(json) = canvas.get_attribute(CONFIG_ATTRIBUTE) else {
        return fallback;
    };
    match RainConfig::from_json(&json) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("rain: ignoring {CONFIG_ATTRIBUTE}: {err}");
            fallback
        }
    }
}

fn find_canvas(document: &Document, config: &RainConfig) -> Option<(HtmlCanvasElement, CanvasRenderingContext2d)> {
    let canvas = document
        .get_element_by_id(&config.canvas_id)?
        .dyn_into::<HtmlCanvasElement>()
        .ok()?;
    let ctx = canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()?;
    Some((canvas, ctx))
}

/// Wires the rain canvas into `document` if this is its page.
///
/// Returns `None`, having registered nothing and drawn nothing, unless
/// `<body id>` matches `config.page_id` and a 2D-capable canvas with
/// `config.canvas_id` exists. Page and canvas ids in the canvas's own
/// override attribute are therefore not consulted.
pub fn activate(window: &Window, document: &Document, config: RainConfig) -> Result<Option<RainDriver>, JsValue> {
    let on_page = document.body().is_some_and(|body| body.id() == config.page_id);
    if !on_page {
        return Ok(None);
    }
    let Some((canvas, ctx)) = find_canvas(document, &config) else {
        log::debug!("rain: no usable #{} canvas", config.canvas_id);
        return Ok(None);
    };

    let config = config_overrides(&canvas, config);
    let seed = (js_sys::Math::random() * 2f64.powi(53)) as u64;
    let engine = RainEngine::seeded(config, seed, now(window)).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let rain = Rain {
        engine,
        surface: CanvasSurface::new(canvas, ctx),
        window: window.clone(),
        frame_id: None,
    };

    let driver = RainDriver {
        rain: Rc::new(RefCell::new(rain)),
        frame: Rc::new(RefCell::new(None)),
    };
    driver.install_frame_callback();
    driver.install_listeners(window, document)?;
    Ok(Some(driver))
}

fn boot() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    match activate(&window, &document, RainConfig::default())? {
        Some(driver) => {
            driver.start();
            log::info!("rain: started");
            ACTIVE.with(|active| *active.borrow_mut() = Some(driver));
        }
        None => log::debug!("rain: inactive on this page"),
    }
    Ok(())
}

/// Activates the rain once the DOM is ready.
pub fn init() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    if document.ready_state() == "loading" {
        let ready = Closure::once_into_js(move || {
            if let Err(e) = boot() {
                log::error!("rain: activation failed: {}", describe(&e));
            }
        });
        document.add_event_listener_with_callback("DOMContentLoaded", ready.unchecked_ref())?;
        Ok(())
    } else {
        boot()
    }
}

/// Runs `f` on the page's rain driver, if one is active.
pub fn with_active(f: impl FnOnce(&RainDriver)) {
    ACTIVE.with(|active| {
        if let Some(driver) = active.borrow().as_ref() {
            f(driver);
        }
    });
}
