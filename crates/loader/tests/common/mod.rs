#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;

use formats::Element;
use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;
use loader::{FetchError, FragmentSource, SceneHost};
use foundation::math::Vec2;
use scene::Session;

/// Serves fragments from memory and remembers the fetch order.
#[derive(Debug, Default)]
pub struct MemorySource {
    pages: BTreeMap<String, String>,
    pub fetched: RefCell<Vec<String>>,
}

impl MemorySource {
    pub fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, body)| (url.to_string(), body.to_string()))
                .collect(),
            fetched: RefCell::new(Vec::new()),
        }
    }
}

impl FragmentSource for MemorySource {
    fn fetch_text<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, Result<String, FetchError>> {
        self.fetched.borrow_mut().push(url.to_string());
        let result = self
            .pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::new(url, "HTTP 404"));
        futures_util::future::ready(result).boxed_local()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Overlay,
    Aside,
}

#[derive(Debug, Clone)]
pub struct RecordedNode {
    pub kind: NodeKind,
    pub html: String,
    pub links: Vec<String>,
}

/// Host that records materialised nodes; handles index into `nodes`.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub session: RefCell<Session<usize>>,
    pub nodes: RefCell<Vec<RecordedNode>>,
    pub styles: RefCell<Vec<String>>,
    /// Camera centres with the number of worlds registered at the time.
    pub camera_moves: RefCell<Vec<(Vec2, usize)>>,
}

impl RecordingHost {
    fn push(&self, kind: NodeKind, element: &Element, links: &[String]) -> usize {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(RecordedNode {
            kind,
            html: element.to_html(),
            links: links.to_vec(),
        });
        nodes.len() - 1
    }
}

impl SceneHost for RecordingHost {
    type Handle = usize;

    fn with_session<R>(&self, f: impl FnOnce(&mut Session<usize>) -> R) -> R {
        f(&mut self.session.borrow_mut())
    }

    fn materialize_overlay(&self, element: &Element, internal_links: &[String]) -> Option<usize> {
        Some(self.push(NodeKind::Overlay, element, internal_links))
    }

    fn attach_aside(&self, element: &Element, _url: &str) -> Option<usize> {
        Some(self.push(NodeKind::Aside, element, &[]))
    }

    fn hoist_style(&self, element: &Element) {
        self.styles.borrow_mut().push(element.text());
    }

    fn center_camera(&self, center: Vec2) {
        let worlds = self.session.borrow().worlds.len();
        self.camera_moves.borrow_mut().push((center, worlds));
    }
}

pub type TestLoader = loader::Loader<MemorySource, RecordingHost>;

pub fn new_loader(pages: &[(&str, &str)]) -> TestLoader {
    loader::Loader::new(MemorySource::new(pages), RecordingHost::default())
}
