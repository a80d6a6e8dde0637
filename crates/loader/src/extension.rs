//! Named extensions invoked by `<script type="infinity">` blocks.
//!
//! The script body is `<name> <args...>`. Instead of evaluating fetched code,
//! the name selects a callback registered by the page, which may only add
//! shapes to the stage in the fragment's coordinate frame.

use std::collections::BTreeMap;

use foundation::math::{Placement, Vec2};
use scene::components::{Drawable2D, Rgba};
use scene::entity::EntityId;
use scene::stage::Stage;

pub type Extension = Box<dyn Fn(&mut ExtensionContext<'_>) -> Result<(), String>>;

/// Capabilities handed to an extension.
pub struct ExtensionContext<'a> {
    source_url: &'a str,
    frame: Placement,
    args: &'a [String],
    stage: &'a mut Stage,
}

impl<'a> ExtensionContext<'a> {
    pub fn new(source_url: &'a str, frame: Placement, args: &'a [String], stage: &'a mut Stage) -> Self {
        Self {
            source_url,
            frame,
            args,
            stage,
        }
    }

    pub fn source_url(&self) -> &str {
        self.source_url
    }

    /// Accumulated offset of the fragment that invoked the extension.
    pub fn frame(&self) -> Placement {
        self.frame
    }

    pub fn args(&self) -> &[String] {
        self.args
    }

    /// Parses argument `index` as a number.
    pub fn number(&self, index: usize) -> Result<f64, String> {
        let raw = self
            .args
            .get(index)
            .ok_or_else(|| format!("missing argument {}", index + 1))?;
        raw.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| format!("argument {} ('{raw}') is not a number", index + 1))
    }

    /// Adds a shape at `local`, relative to the fragment's frame.
    pub fn add_shape(&mut self, local: Placement, drawable: Drawable2D) -> EntityId {
        self.stage.add(self.frame.then(local), drawable)
    }
}

#[derive(Default)]
pub struct ExtensionRegistry {
    extensions: BTreeMap<String, Extension>,
}

impl std::fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("extensions", &self.extensions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `disc` and `text` extensions.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("disc", disc);
        registry.register("text", text);
        registry
    }

    /// Registers `f` under `name`, replacing any previous extension.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&mut ExtensionContext<'_>) -> Result<(), String> + 'static,
    ) {
        self.extensions.insert(name.into(), Box::new(f));
    }

    pub fn get(&self, name: &str) -> Option<&Extension> {
        self.extensions.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.extensions.keys().map(String::as_str)
    }
}

/// Splits a script body into the extension name and its arguments.
pub fn parse_invocation(script: &str) -> Option<(String, Vec<String>)> {
    let mut words = script.split_whitespace();
    let name = words.next()?.to_string();
    Some((name, words.map(str::to_string).collect()))
}

const DISC_COLOR: Rgba = [1.0, 0.0, 0.0, 1.0];

/// `disc <radius> [<x> <y>]`: a red filled circle.
fn disc(ctx: &mut ExtensionContext<'_>) -> Result<(), String> {
    let radius = ctx.number(0)?;
    if radius < 0.0 {
        return Err(format!("radius {radius} is negative"));
    }
    let at = match ctx.args().len() {
        1 => Vec2::ZERO,
        3 => Vec2::new(ctx.number(1)?, ctx.number(2)?),
        n => return Err(format!("expected 1 or 3 arguments, got {n}")),
    };
    ctx.add_shape(
        Placement::new(at, 0.0),
        Drawable2D::disc(radius, DISC_COLOR),
    );
    Ok(())
}

/// `text <x> <y> <words...>`: a label drawn on the canvas.
fn text(ctx: &mut ExtensionContext<'_>) -> Result<(), String> {
    let at = Vec2::new(ctx.number(0)?, ctx.number(1)?);
    let words = ctx.args().get(2..).unwrap_or_default().join(" ");
    if words.is_empty() {
        return Err("no text given".to_string());
    }
    ctx.add_shape(Placement::new(at, 0.0), Drawable2D::label(words));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ExtensionContext, ExtensionRegistry, parse_invocation};
    use foundation::math::{Placement, Vec2};
    use scene::components::Shape2D;
    use scene::stage::Stage;

    fn run(name: &str, args: &[&str], frame: Placement, stage: &mut Stage) -> Result<(), String> {
        let registry = ExtensionRegistry::with_builtins();
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let mut ctx = ExtensionContext::new("/", frame, &args, stage);
        registry.get(name).expect("builtin")(&mut ctx)
    }

    #[test]
    fn parses_name_and_args() {
        assert_eq!(
            parse_invocation("  disc 50\n 1 2 "),
            Some(("disc".to_string(), vec!["50".into(), "1".into(), "2".into()]))
        );
        assert_eq!(parse_invocation(" \n "), None);
    }

    #[test]
    fn disc_is_placed_in_fragment_frame() {
        let mut stage = Stage::new();
        let frame = Placement::new(Vec2::new(100.0, 200.0), 0.5);
        run("disc", &["50", "1", "2"], frame, &mut stage).unwrap();

        let drawn = stage.drawables();
        assert_eq!(drawn.len(), 1);
        let (_, transform, drawable) = drawn[0];
        assert_eq!(transform.position, Vec2::new(101.0, 202.0));
        assert_eq!(transform.rotation, 0.5);
        assert_eq!(drawable.shape, Shape2D::Disc { radius: 50.0 });
    }

    #[test]
    fn text_joins_remaining_words() {
        let mut stage = Stage::new();
        run("text", &["0", "10", "hello", "there"], Placement::ORIGIN, &mut stage).unwrap();
        let drawn = stage.drawables();
        assert!(matches!(
            &drawn[0].2.shape,
            Shape2D::Label { text, .. } if text == "hello there"
        ));
    }

    #[test]
    fn bad_arguments_are_reported() {
        let mut stage = Stage::new();
        assert!(run("disc", &[], Placement::ORIGIN, &mut stage).is_err());
        assert!(run("disc", &["ten"], Placement::ORIGIN, &mut stage).is_err());
        assert!(run("disc", &["5", "1"], Placement::ORIGIN, &mut stage).is_err());
        assert!(run("text", &["0", "0"], Placement::ORIGIN, &mut stage).is_err());
        assert!(stage.is_empty());
    }

    #[test]
    fn custom_extensions_can_be_registered() {
        let mut registry = ExtensionRegistry::new();
        registry.register("mark", |ctx| {
            ctx.add_shape(Placement::ORIGIN, scene::components::Drawable2D::label(ctx.source_url().to_string()));
            Ok(())
        });
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["mark"]);
        assert!(registry.get("disc").is_none());
    }
}
