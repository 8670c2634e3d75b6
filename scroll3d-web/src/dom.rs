/// DOM-backed layout and model surface
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Window};

use scroll3d_core::{CameraOrbit, ModelSurface, PageLayout, Rect, Viewport, ViewportStyle};

/// Live page geometry read from bounding client rects
pub struct DomLayout {
    window: Window,
    container: Element,
    sections: Vec<Element>,
}

impl DomLayout {
    pub fn new(window: Window, container: Element, sections: Vec<Element>) -> Self {
        Self {
            window,
            container,
            sections,
        }
    }

    pub fn sections(&self) -> &[Element] {
        &self.sections
    }

    /// Position of `target` among the observed sections
    pub fn index_of(&self, target: &JsValue) -> Option<usize> {
        self.sections.iter().position(|section| {
            let section: &JsValue = section.as_ref();
            section == target
        })
    }
}

fn rect_of(element: &Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect::new(rect.top(), rect.height())
}

impl PageLayout for DomLayout {
    fn viewport(&self) -> Viewport {
        let height = self
            .window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0);
        Viewport::new(height)
    }

    fn container_rect(&self) -> Rect {
        rect_of(&self.container)
    }

    fn section_count(&self) -> usize {
        self.sections.len()
    }

    fn section_rect(&self, index: usize) -> Rect {
        rect_of(&self.sections[index])
    }
}

/// A `<model-viewer>`-style element plus the section elements it follows
pub struct DomSurface {
    model: HtmlElement,
    sections: Vec<Element>,
    active_class: String,
    loaded_class: String,
}

impl DomSurface {
    pub fn new(
        model: HtmlElement,
        sections: Vec<Element>,
        active_class: String,
        loaded_class: String,
    ) -> Self {
        Self {
            model,
            sections,
            active_class,
            loaded_class,
        }
    }

    pub fn model(&self) -> &HtmlElement {
        &self.model
    }
}

fn report(what: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        log::warn!("{} failed: {:?}", what, err);
    }
}

impl ModelSurface for DomSurface {
    fn loaded_source(&self) -> Option<String> {
        self.model.get_attribute("src")
    }

    fn set_source(&mut self, source: &str) {
        report("set model src", self.model.set_attribute("src", source));
    }

    fn set_camera_orbit(&mut self, orbit: &CameraOrbit) {
        report(
            "set camera orbit",
            self.model.set_attribute("camera-orbit", &orbit.to_string()),
        );
    }

    fn apply_style(&mut self, style: &ViewportStyle) {
        let css = self.model.style();
        if let Some(transition) = style.css_transition() {
            report("set transition", css.set_property("transition", &transition));
        }
        report("set opacity", css.set_property("opacity", &style.opacity.to_string()));
        report("set transform", css.set_property("transform", &style.css_matrix3d()));
    }

    fn set_section_active(&mut self, index: usize, active: bool) {
        let Some(section) = self.sections.get(index) else {
            return;
        };
        let classes = section.class_list();
        if active {
            report("add active class", classes.add_1(&self.active_class));
        } else {
            report("remove active class", classes.remove_1(&self.active_class));
        }
    }

    fn mark_loaded(&mut self) {
        report("add loaded class", self.model.class_list().add_1(&self.loaded_class));
    }
}

/// Every element matching `selector`, in document order
pub fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, JsValue> {
    let nodes = document.query_selector_all(selector)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// The single element matching `selector`, or an error naming what is missing
pub fn query_one<T: JsCast>(document: &Document, selector: &str) -> Result<T, JsValue> {
    document
        .query_selector(selector)?
        .ok_or_else(|| JsValue::from_str(&format!("required element not found: {}", selector)))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("element has the wrong type: {}", selector)))
}
