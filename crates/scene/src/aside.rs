/// A contextual side panel tagged with the URL of the fragment it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Aside<H> {
    pub handle: H,
    pub url: String,
}

#[derive(Debug)]
pub struct AsideRegistry<H> {
    asides: Vec<Aside<H>>,
}

impl<H> Default for AsideRegistry<H> {
    fn default() -> Self {
        Self { asides: Vec::new() }
    }
}

impl<H> AsideRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, handle: H, url: impl Into<String>) {
        self.asides.push(Aside {
            handle,
            url: url.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.asides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.asides.is_empty()
    }

    /// Each panel with whether it should be shown while `active_url` is the
    /// active world.
    pub fn visibility<'a>(&'a self, active_url: &'a str) -> impl Iterator<Item = (&'a H, bool)> + 'a {
        self.asides.iter().map(move |a| (&a.handle, a.url == active_url))
    }
}

#[cfg(test)]
mod tests {
    use super::AsideRegistry;

    #[test]
    fn only_matching_panels_are_visible() {
        let mut asides = AsideRegistry::new();
        asides.add(1, "/");
        asides.add(2, "/blog.html");
        asides.add(3, "/blog.html");

        let shown: Vec<_> = asides.visibility("/blog.html").map(|(h, v)| (*h, v)).collect();
        assert_eq!(shown, vec![(1, false), (2, true), (3, true)]);
        assert!(asides.visibility("/other.html").all(|(_, v)| !v));
    }
}
