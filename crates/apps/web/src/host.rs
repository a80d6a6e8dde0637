//! Browser side of the loader: gloo-net fetches and DOM materialisation.

use formats::Element as MarkupElement;
use foundation::math::Vec2;
use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;
use gloo_net::http::Request;
use loader::{FetchError, FragmentSource, SceneHost};
use scene::Session;
use scene::links::is_internal_href;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlTemplateElement};

use crate::config::site;

/// Fetches fragments over HTTP. No caching.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlooSource;

impl FragmentSource for GlooSource {
    fn fetch_text<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, Result<String, FetchError>> {
        async move {
            let resp = Request::get(url)
                .send()
                .await
                .map_err(|e| FetchError::new(url, e.to_string()))?;
            if !resp.ok() {
                return Err(FetchError::new(url, format!("HTTP {}", resp.status())));
            }
            resp.text()
                .await
                .map_err(|e| FetchError::new(url, e.to_string()))
        }
        .boxed_local()
    }
}

/// Materialises fragment elements into the live document.
#[derive(Debug, Clone)]
pub struct DomHost {
    document: Document,
    overlay_parent: HtmlElement,
    aside_panel: HtmlElement,
}

impl DomHost {
    /// Prepares the overlay container (cleared, full-viewport, click-through)
    /// and finds or creates the aside panel.
    pub fn new(document: Document) -> Result<Self, JsValue> {
        let overlay_parent = document
            .query_selector(site::OVERLAY_PARENT_SELECTOR)?
            .ok_or_else(|| JsValue::from_str("missing overlay parent <world>"))?
            .dyn_into::<HtmlElement>()?;
        overlay_parent.set_inner_html("");
        let style = overlay_parent.style();
        style.set_property("position", "absolute")?;
        style.set_property("top", "0")?;
        style.set_property("left", "0")?;
        style.set_property("width", "100%")?;
        style.set_property("height", "100%")?;
        style.set_property("overflow", "hidden")?;
        style.set_property("pointer-events", "none")?;
        style.set_property("z-index", "1000")?;

        let aside_panel = match document.get_element_by_id(site::ASIDE_PANEL_ID) {
            Some(el) => el.dyn_into::<HtmlElement>()?,
            None => {
                let el = document.create_element("div")?.dyn_into::<HtmlElement>()?;
                el.set_id(site::ASIDE_PANEL_ID);
                document
                    .body()
                    .ok_or_else(|| JsValue::from_str("no body"))?
                    .append_child(&el)?;
                el
            }
        };

        Ok(Self {
            document,
            overlay_parent,
            aside_panel,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn element_from_html(&self, html: &str) -> Result<HtmlElement, JsValue> {
        let template = self
            .document
            .create_element("template")?
            .dyn_into::<HtmlTemplateElement>()?;
        template.set_inner_html(html);
        template
            .content()
            .first_element_child()
            .ok_or_else(|| JsValue::from_str("markup produced no element"))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| JsValue::from_str("not an HTML element"))
    }

    fn try_overlay(&self, element: &MarkupElement, links: &[String]) -> Result<HtmlElement, JsValue> {
        let el = self.element_from_html(&element.to_html())?;
        style_overlay(&el)?;
        if !links.is_empty() {
            intercept_links_in(&el, links)?;
        }
        self.overlay_parent.append_child(&el)?;
        Ok(el)
    }

    fn try_aside(&self, element: &MarkupElement, url: &str) -> Result<HtmlElement, JsValue> {
        let el = self.element_from_html(&element.to_html())?;
        let active = crate::with_session(|s| s.tracker.active_url() == Some(url));
        el.class_list().toggle_with_force(site::HIDDEN_CLASS, !active)?;
        let links: Vec<String> = loader::internal_links(element);
        if !links.is_empty() {
            intercept_links_in(&el, &links)?;
        }
        self.aside_panel.append_child(&el)?;
        Ok(el)
    }

    fn try_style(&self, element: &MarkupElement) -> Result<(), JsValue> {
        let el = self.element_from_html(&element.to_html())?;
        self.document
            .head()
            .ok_or_else(|| JsValue::from_str("no head"))?
            .append_child(&el)?;
        Ok(())
    }
}

impl SceneHost for DomHost {
    type Handle = HtmlElement;

    fn with_session<R>(&self, f: impl FnOnce(&mut Session<HtmlElement>) -> R) -> R {
        crate::with_session(f)
    }

    fn materialize_overlay(&self, element: &MarkupElement, internal_links: &[String]) -> Option<HtmlElement> {
        self.try_overlay(element, internal_links)
            .map_err(|err| log::warn!("overlay <{}> not created: {err:?}", element.name()))
            .ok()
    }

    fn attach_aside(&self, element: &MarkupElement, url: &str) -> Option<HtmlElement> {
        self.try_aside(element, url)
            .map_err(|err| log::warn!("aside from {url} not attached: {err:?}"))
            .ok()
    }

    fn hoist_style(&self, element: &MarkupElement) {
        if let Err(err) = self.try_style(element) {
            log::warn!("style not hoisted: {err:?}");
        }
    }

    fn center_camera(&self, center: Vec2) {
        crate::center_camera(center);
    }
}

/// Positions an overlay by transform only and keeps wheel/scroll on it from
/// scrolling the page.
fn style_overlay(el: &HtmlElement) -> Result<(), JsValue> {
    let style = el.style();
    style.set_property("position", "absolute")?;
    style.set_property("transform-origin", "top left")?;
    style.set_property("top", "0")?;
    style.set_property("left", "0")?;
    style.set_property("pointer-events", "auto")?;

    for event in ["wheel", "scroll"] {
        let prevent = Closure::wrap(Box::new(move |e: web_sys::Event| {
            e.prevent_default();
        }) as Box<dyn FnMut(_)>);
        el.add_event_listener_with_callback(event, prevent.as_ref().unchecked_ref())?;
        prevent.forget();
    }
    Ok(())
}

fn intercept_links_in(root: &HtmlElement, links: &[String]) -> Result<(), JsValue> {
    let mut anchors: Vec<Element> = Vec::new();
    if root.tag_name().eq_ignore_ascii_case("a") {
        anchors.push(root.clone().into());
    }
    let found = root.query_selector_all("a[href]")?;
    for i in 0..found.length() {
        if let Some(el) = found.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            anchors.push(el);
        }
    }
    for anchor in anchors {
        if let Some(href) = anchor.get_attribute("href")
            && links.iter().any(|l| *l == href)
        {
            intercept_link(&anchor, href)?;
        }
    }
    Ok(())
}

/// Replaces navigation on `anchor` with a camera move to `href`'s world.
/// The target is looked up at click time.
pub fn intercept_link(anchor: &Element, href: String) -> Result<(), JsValue> {
    let on_click = Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
        e.prevent_default();
        crate::navigate_to(&href);
    }) as Box<dyn FnMut(_)>);
    anchor.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();
    Ok(())
}

/// Rewires the static header's internal links. Returns how many were wired.
pub fn rewire_header_links(document: &Document) -> Result<usize, JsValue> {
    let found = document.query_selector_all(site::HEADER_LINK_SELECTOR)?;
    let mut wired = 0;
    for i in 0..found.length() {
        let Some(anchor) = found.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        if let Some(href) = anchor.get_attribute("href")
            && is_internal_href(&href)
        {
            intercept_link(&anchor, href)?;
            wired += 1;
        }
    }
    Ok(wired)
}
