use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;

use formats::{Document, Element, parse_pair};
use foundation::math::{Placement, Vec2};
use runtime::event_bus::Severity;
use scene::components::Drawable2D;
use scene::links::is_internal_href;
use scene::region::WorldRegion;

use crate::error::LoadError;
use crate::extension::{ExtensionContext, ExtensionRegistry, parse_invocation};
use crate::host::SceneHost;
use crate::source::FragmentSource;

/// Outcome of one top-level load, including every nested fragment.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LoadReport {
    pub worlds: usize,
    pub overlays: usize,
    pub asides: usize,
    pub errors: Vec<LoadError>,
    /// `<camera xy>` of the top-level fragment.
    pub camera_hint: Option<Vec2>,
}

/// Recursive world fragment loader.
///
/// Nested worlds are loaded depth-first and one at a time, so world
/// registration follows document order regardless of fetch latency.
#[derive(Debug)]
pub struct Loader<S, H> {
    source: S,
    host: H,
    extensions: ExtensionRegistry,
}

impl<S: FragmentSource, H: SceneHost> Loader<S, H> {
    pub fn new(source: S, host: H) -> Self {
        Self {
            source,
            host,
            extensions: ExtensionRegistry::with_builtins(),
        }
    }

    pub fn with_extensions(mut self, extensions: ExtensionRegistry) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Loads the top-level fragment at `url` with zero offset and reads its
    /// camera hint.
    pub async fn load_root(&self, url: &str) -> LoadReport {
        let mut report = LoadReport::default();
        self.load_fragment(url.to_string(), Placement::ORIGIN, Vec::new(), true, &mut report)
            .await;
        report
    }

    /// Loads the fragment at `url` into `frame`. Failures are recorded in the
    /// report and on the session's event bus, never returned.
    pub async fn load(&self, url: &str, frame: Placement) -> LoadReport {
        let mut report = LoadReport::default();
        self.load_fragment(url.to_string(), frame, Vec::new(), false, &mut report)
            .await;
        report
    }

    fn fail(&self, report: &mut LoadReport, err: LoadError) {
        self.host
            .with_session(|s| s.record(err.severity(), err.kind(), err.to_string()));
        report.errors.push(err);
    }

    fn load_fragment<'a>(
        &'a self,
        url: String,
        frame: Placement,
        ancestors: Vec<String>,
        top_level: bool,
        report: &'a mut LoadReport,
    ) -> LocalBoxFuture<'a, ()> {
        async move {
            log::info!(
                "loading {url} at ({}, {}) angle {}",
                frame.origin.x,
                frame.origin.y,
                frame.angle
            );
            let text = match self.source.fetch_text(&url).await {
                Ok(text) => text,
                Err(err) => return self.fail(report, err.into()),
            };
            let doc = Document::parse(&text);
            for err in doc.errors() {
                log::debug!("{url}: {err}");
            }

            for aside in doc.outside_worlds("aside") {
                if let Some(handle) = self.host.attach_aside(aside, &url) {
                    self.host.with_session(|s| s.add_aside(handle, url.as_str()));
                    report.asides += 1;
                }
            }
            for style in doc.outside_worlds("style") {
                self.host.hoist_style(style);
            }

            let Some(world) = doc.world() else {
                return self.fail(report, LoadError::MissingRootWorld { url });
            };
            if !self.register_world(&doc, world, &url, frame, report) {
                return;
            }
            if top_level {
                report.camera_hint = self.camera_hint(world, &url, frame, report);
                if let Some(center) = report.camera_hint {
                    self.host.center_camera(center);
                }
            }

            let mut chain = ancestors;
            chain.push(url.clone());

            for child in world.child_elements() {
                match child.name() {
                    "script" if is_extension_script(child) => {
                        self.run_extension(child, &url, frame, report);
                    }
                    "style" => self.host.hoist_style(child),
                    "world" => {
                        let Some(src) = child.attr("src").map(str::trim).filter(|s| !s.is_empty())
                        else {
                            self.fail(
                                report,
                                LoadError::MissingEmbedSource {
                                    parent_url: url.clone(),
                                },
                            );
                            continue;
                        };
                        if chain.iter().any(|a| a == src) {
                            self.fail(report, LoadError::CyclicEmbed { url: src.to_string() });
                            continue;
                        }
                        let Some(local) = self.placement_of(child, &url, report) else {
                            continue;
                        };
                        self.load_fragment(
                            src.to_string(),
                            frame.then(local),
                            chain.clone(),
                            false,
                            &mut *report,
                        )
                        .await;
                    }
                    "camera" => {}
                    _ => self.add_overlay(child, &url, frame, report),
                }
            }
        }
        .boxed_local()
    }

    /// Registers the fragment's world. Returns false if the subtree must be
    /// abandoned.
    fn register_world(
        &self,
        doc: &Document,
        world: &Element,
        url: &str,
        frame: Placement,
        report: &mut LoadReport,
    ) -> bool {
        let name = doc.title().unwrap_or_else(|| url.to_string());
        let size = match world.size() {
            Ok(size) => size,
            Err(source) => {
                self.fail(
                    report,
                    LoadError::InvalidAttribute {
                        url: url.to_string(),
                        tag: "world".to_string(),
                        source,
                    },
                );
                return false;
            }
        };
        self.host.with_session(|s| match size {
            Some(size) => {
                let region = WorldRegion::bounded(name.clone(), url, frame.origin, size);
                let corner = region.bounds().map_or(frame.origin, |b| b.bottom_left());
                s.register_world(region);
                s.stage
                    .add(Placement::new(frame.origin, 0.0), Drawable2D::outline(size));
                s.stage
                    .add(Placement::new(corner, 0.0), Drawable2D::label(name));
            }
            None => s.register_world(WorldRegion::main(name, url, frame.origin)),
        });
        report.worlds += 1;
        true
    }

    fn camera_hint(
        &self,
        world: &Element,
        url: &str,
        frame: Placement,
        report: &mut LoadReport,
    ) -> Option<Vec2> {
        let xy = world.child_elements().find(|e| e.is("camera"))?.attr("xy")?;
        match parse_pair("xy", xy) {
            Ok(local) => Some(frame.origin + local),
            Err(source) => {
                self.fail(
                    report,
                    LoadError::InvalidAttribute {
                        url: url.to_string(),
                        tag: "camera".to_string(),
                        source,
                    },
                );
                None
            }
        }
    }

    fn placement_of(&self, element: &Element, url: &str, report: &mut LoadReport) -> Option<Placement> {
        match element.placement() {
            Ok(p) => Some(p),
            Err(source) => {
                self.fail(
                    report,
                    LoadError::InvalidAttribute {
                        url: url.to_string(),
                        tag: element.name().to_string(),
                        source,
                    },
                );
                None
            }
        }
    }

    fn add_overlay(&self, element: &Element, url: &str, frame: Placement, report: &mut LoadReport) {
        let Some(local) = self.placement_of(element, url, report) else {
            return;
        };
        if element.is("button") {
            log::debug!("found button in {url}: {}", element.text().trim());
        }
        let links = internal_links(element);
        let Some(handle) = self.host.materialize_overlay(element, &links) else {
            return;
        };
        let placement = frame.then(local);
        self.host.with_session(|s| s.add_overlay(handle, placement));
        report.overlays += 1;
    }

    fn run_extension(&self, script: &Element, url: &str, frame: Placement, report: &mut LoadReport) {
        let Some((name, args)) = parse_invocation(&script.text()) else {
            log::debug!("empty extension script in {url}");
            return;
        };
        let Some(extension) = self.extensions.get(&name) else {
            return self.fail(
                report,
                LoadError::UnknownExtension {
                    name,
                    url: url.to_string(),
                },
            );
        };
        let result = self.host.with_session(|s| {
            let mut ctx = ExtensionContext::new(url, frame, &args, &mut s.stage);
            extension(&mut ctx)
        });
        match result {
            Ok(()) => self.host.with_session(|s| {
                s.record(Severity::Info, "extension", format!("{name} in {url}"))
            }),
            Err(message) => self.fail(
                report,
                LoadError::ExtensionFailed {
                    name,
                    url: url.to_string(),
                    message,
                },
            ),
        }
    }
}

fn is_extension_script(element: &Element) -> bool {
    element
        .attr("type")
        .is_some_and(|t| t.trim().eq_ignore_ascii_case("infinity"))
}

/// Internal hrefs of `element` and its descendant links, deduplicated in
/// document order.
pub fn internal_links(element: &Element) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    let anchors = std::iter::once(element)
        .filter(|e| e.is("a"))
        .chain(element.descendants_by_tag("a"));
    for anchor in anchors {
        let Some(href) = anchor.attr("href") else {
            continue;
        };
        if is_internal_href(href) && !links.iter().any(|l| l == href) {
            links.push(href.to_string());
        }
    }
    links
}
