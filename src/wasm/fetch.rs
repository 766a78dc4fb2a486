use std::time::Duration;

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CustomEvent, CustomEventInit, Document, Element, HtmlScriptElement, Response, Window};

use super::canvas::describe;
use crate::error::LoadError;
use crate::loader::{Fragment, RetryPolicy, LOADED_EVENT, READY_EVENT};

async fn sleep(delay: Duration) {
    let ms = delay.as_millis().min(i32::MAX as u128) as i32;
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let scheduled = web_sys::window()
            .map(|w| w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms).is_ok())
            .unwrap_or(false);
        if !scheduled {
            let _ = resolve.call0(&JsValue::UNDEFINED);
        }
    });
    let _ = JsFuture::from(promise).await;
}

async fn fetch_text(window: &Window, url: &str) -> Result<String, LoadError> {
    let transport = |e: JsValue| LoadError::Transport {
        url: url.to_string(),
        message: describe(&e),
    };
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(transport)?
        .dyn_into()
        .map_err(transport)?;
    if !response.ok() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }
    let body = JsFuture::from(response.text().map_err(transport)?)
        .await
        .map_err(transport)?;
    body.as_string().ok_or_else(|| LoadError::Transport {
        url: url.to_string(),
        message: "response body is not text".into(),
    })
}

/// Scripts set through `innerHTML` never run; swap each for a fresh element.
/// `async = false` makes external scripts execute in document order.
fn revive_scripts(document: &Document, target: &Element) -> Result<(), JsValue> {
    let scripts = target.query_selector_all("script")?;
    for i in 0..scripts.length() {
        let Some(old) = scripts.item(i) else { continue };
        let old: HtmlScriptElement = old.dyn_into()?;
        let fresh: HtmlScriptElement = document.create_element("script")?.dyn_into()?;
        for name in old.get_attribute_names().iter() {
            if let Some(name) = name.as_string() {
                if let Some(value) = old.get_attribute(&name) {
                    fresh.set_attribute(&name, &value)?;
                }
            }
        }
        fresh.set_async(false);
        fresh.set_text(&old.text()?)?;
        if let Some(parent) = old.parent_node() {
            parent.replace_child(&fresh, &old)?;
        }
    }
    Ok(())
}

fn dispatch(document: &Document, name: &str, component: Option<&str>) {
    let init = CustomEventInit::new();
    if let Some(component) = component {
        let detail = js_sys::Object::new();
        let _ = js_sys::Reflect::set(&detail, &"component".into(), &component.into());
        init.set_detail(&detail);
    }
    match CustomEvent::new_with_event_init_dict(name, &init) {
        Ok(event) => {
            let _ = document.dispatch_event(&event);
        }
        Err(e) => log::warn!("components: cannot create {name} event: {}", describe(&e)),
    }
}

/// Returns `Ok(false)` when the container was already filled.
async fn load_fragment(
    window: &Window,
    document: &Document,
    fragment: &Fragment,
    policy: &RetryPolicy,
) -> Result<bool, LoadError> {
    let target = document
        .get_element_by_id(&fragment.target_id)
        .ok_or_else(|| LoadError::MissingTarget(fragment.target_id.clone()))?;
    if !target.inner_html().trim().is_empty() {
        return Ok(false);
    }

    let url = fragment.url.as_str();
    let html = policy.run(move |_| fetch_text(window, url), sleep).await?;

    target.set_inner_html(&html);
    revive_scripts(document, &target).map_err(|e| LoadError::Inject {
        fragment: fragment.name.clone(),
        message: describe(&e),
    })?;
    Ok(true)
}

/// Loads `fragments` in order into their containers, then announces
/// completion on `document`.
pub async fn load_components(fragments: Vec<Fragment>, policy: RetryPolicy) {
    let Some(window) = web_sys::window() else { return };
    let Some(document) = window.document() else { return };

    for fragment in &fragments {
        match load_fragment(&window, &document, fragment, &policy).await {
            Ok(true) => {
                log::debug!("components: loaded {}", fragment.name);
                dispatch(&document, LOADED_EVENT, Some(&fragment.name));
            }
            Ok(false) => log::debug!("components: {} already present", fragment.name),
            Err(LoadError::MissingTarget(id)) => log::debug!("components: no #{id} on this page"),
            Err(err) => {
                log::error!("components: giving up on {}: {err}", fragment.name);
                if let Some(target) = document.get_element_by_id(&fragment.target_id) {
                    target.set_inner_html(&fragment.error_html());
                }
            }
        }
    }
    dispatch(&document, READY_EVENT, None);
}
