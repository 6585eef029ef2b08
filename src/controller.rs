//! Sequencing layout triggers against a host.
//!
//! A [`Controller`] owns one [`Host`] (an element in a page, a widget in a UI
//! toolkit, a mock in tests) and re-runs the layout whenever something that
//! affects it changes:
//!
//! 1. the image's natural size becomes known ([`Controller::image_loaded`]),
//! 2. the image or safe area is reconfigured,
//! 3. the container is resized, pushed by the host
//!    ([`Controller::container_resized`]) or found by polling
//!    ([`Controller::tick`]).
//!
//! Every trigger runs to completion before returning; there is no internal
//! concurrency. Layouts that cannot be rendered (a container with no area)
//! are skipped rather than applied.

use alloc::collections::BTreeMap;
use alloc::collections::btree_map::Entry;
use alloc::string::String;
use core::time::Duration;

use tracing::{debug, trace, warn};

use crate::cover::{ContainerSize, ImageSize, Placement};
use crate::engine::CoverLayoutEngine;
use crate::options::{ConfigurationError, CoverOptions};
use crate::render::{RenderMode, RenderSurface, StyleSurface, StyleWriter};
use crate::resize::{PollSchedule, ResizeSource, SizeWatcher};
use crate::safe_area::SafeAreaSpec;

/// Capabilities the controller needs from its environment.
pub trait Host: StyleWriter {
    /// Current rendered size of the container.
    fn container_size(&self) -> ContainerSize;

    /// Current `background-image` style value of the container, if any.
    fn background_image(&self) -> Option<String>;

    /// Whether background images can be sized and positioned natively.
    fn supports_background_size(&self) -> bool;

    /// Whether the host reports container resizes itself.
    fn supports_resize_observer(&self) -> bool {
        false
    }

    /// Whether the container is statically positioned.
    fn position_is_static(&self) -> bool {
        false
    }

    /// Point the fallback overlay image at `url`, creating it if needed.
    fn set_overlay_source(&mut self, url: &str);

    /// Start loading `url` to learn its natural size.
    ///
    /// Return the size if it is already known (cached images); otherwise
    /// report it later through [`Controller::image_loaded`].
    fn request_image(&mut self, url: &str) -> Option<ImageSize>;
}

/// Drives a [`CoverLayoutEngine`] for one host.
pub struct Controller<H> {
    host: H,
    options: CoverOptions,
    image_url: String,
    mode: RenderMode,
    resize: ResizeSource,
    schedule: PollSchedule,
    watcher: SizeWatcher,
    engine: Option<CoverLayoutEngine>,
}

impl<H: Host> Controller<H> {
    /// Attach to `host` with `options`.
    ///
    /// Fails if no image is configured and none can be derived from the host's
    /// `background-image`, or if the options are invalid.
    pub fn initialize(mut host: H, options: CoverOptions) -> Result<Self, ConfigurationError> {
        options.validate()?;
        let image_url = resolve_image(options.image.as_deref(), &host)?;

        let mode = RenderMode::detect(host.supports_background_size());
        let position_is_static = host.position_is_static();
        host.apply_all(&mode.prepare(position_is_static));

        let resize = ResizeSource::detect(host.supports_resize_observer(), options.resize_interval);
        debug!(?mode, ?resize, image = %image_url, "attached");

        let mut controller = Self {
            host,
            schedule: PollSchedule::new(options.resize_interval),
            options,
            image_url: String::new(),
            mode,
            resize,
            watcher: SizeWatcher::new(),
            engine: None,
        };
        controller.load(image_url);
        Ok(controller)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn options(&self) -> &CoverOptions {
        &self.options
    }

    /// URL of the current image, explicit or derived.
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn resize_source(&self) -> ResizeSource {
        self.resize
    }

    /// Whether the current image's natural size is known.
    pub fn is_loaded(&self) -> bool {
        self.engine.is_some()
    }

    pub fn engine(&self) -> Option<&CoverLayoutEngine> {
        self.engine.as_ref()
    }

    /// Replace the image. `None` or an empty URL re-derives it from the host's
    /// `background-image`.
    ///
    /// The widget is unloaded until the new image's size is known.
    pub fn set_image(&mut self, url: Option<&str>) -> Result<Option<Placement>, ConfigurationError> {
        let resolved = resolve_image(url, &self.host)?;
        self.options = CoverOptions {
            image: url.filter(|u| !u.is_empty()).map(String::from),
            ..self.options.clone()
        };
        Ok(self.load(resolved))
    }

    /// Report the natural size of `url`.
    ///
    /// Ignored when `url` is no longer the current image.
    pub fn image_loaded(&mut self, url: &str, size: ImageSize) -> Option<Placement> {
        if url != self.image_url {
            debug!(stale = %url, current = %self.image_url, "ignoring load of replaced image");
            return None;
        }
        self.finish_load(size)
    }

    /// Replace the safe area. `None` resets it to the whole image.
    ///
    /// Before the image is loaded the spec is only stored.
    pub fn set_safe_area(&mut self, spec: Option<&str>) -> Result<Option<Placement>, ConfigurationError> {
        let spec = match spec {
            Some(text) => SafeAreaSpec::parse(text)?,
            None => SafeAreaSpec::default(),
        };
        self.options = CoverOptions {
            safe_area: spec,
            ..self.options.clone()
        };
        match self.engine.as_mut() {
            Some(engine) => engine.set_safe_area(spec),
            None => return Ok(None),
        }
        Ok(self.layout())
    }

    /// Apply a new set of options to this controller.
    ///
    /// The image is reloaded only when `options.image` names a different URL;
    /// `None` keeps the current image.
    pub fn configure(&mut self, options: CoverOptions) -> Result<Option<Placement>, ConfigurationError> {
        options.validate()?;
        let new_image = options
            .image
            .as_deref()
            .filter(|url| !url.is_empty() && *url != self.image_url)
            .map(String::from);

        self.schedule.set_interval(options.resize_interval);
        if self.resize.is_polling() {
            self.resize = ResizeSource::Poll(options.resize_interval);
        }
        self.options = options;

        if let Some(url) = new_image {
            return Ok(self.load(url));
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.set_safe_area(self.options.safe_area);
            engine.set_policies(self.options.fit_policy, self.options.clamp_policy);
        }
        Ok(self.layout())
    }

    /// Recompute and apply the layout for the current container size.
    ///
    /// Returns the applied placement; `None` if the image is not loaded or the
    /// layout is not renderable.
    pub fn layout(&mut self) -> Option<Placement> {
        if self.engine.is_none() {
            return None;
        }
        let container = self.host.container_size();
        self.layout_at(container)
    }

    /// Host-pushed resize notification. Lays out only if the size changed.
    pub fn container_resized(&mut self, size: ContainerSize) -> Option<Placement> {
        if !self.watcher.observe(size) {
            return None;
        }
        debug!(width = size.width, height = size.height, "container resized");
        self.layout_at(size)
    }

    /// Poll for container size changes at monotonic time `now`.
    ///
    /// Does nothing when the host observes resizes itself or when the poll
    /// interval has not elapsed.
    pub fn tick(&mut self, now: Duration) -> Option<Placement> {
        if !self.resize.is_polling() || !self.schedule.due(now) {
            return None;
        }
        let size = self.host.container_size();
        if !self.watcher.observe(size) {
            return None;
        }
        debug!(width = size.width, height = size.height, "container resize detected by poll");
        self.layout_at(size)
    }

    fn load(&mut self, url: String) -> Option<Placement> {
        self.engine = None;
        self.watcher.reset();
        self.host.apply_all(&self.mode.image_declarations(&url));
        if self.mode == RenderMode::Fallback {
            self.host.set_overlay_source(&url);
        }
        let known = self.host.request_image(&url);
        debug!(image = %url, cached = known.is_some(), "loading image");
        self.image_url = url;
        known.and_then(|size| self.finish_load(size))
    }

    fn finish_load(&mut self, size: ImageSize) -> Option<Placement> {
        let engine = CoverLayoutEngine::new(size, self.options.safe_area)
            .fit_policy(self.options.fit_policy)
            .clamp_policy(self.options.clamp_policy);
        debug!(
            width = size.width(),
            height = size.height(),
            safe_area = ?engine.safe_area(),
            "image loaded"
        );
        self.engine = Some(engine);
        self.layout()
    }

    fn layout_at(&mut self, container: ContainerSize) -> Option<Placement> {
        let engine = self.engine.as_ref()?;
        self.watcher.record(container);
        let layout = engine.layout(container);
        let Some(placement) = layout.to_placement() else {
            warn!(
                width = container.width,
                height = container.height,
                ?layout,
                "skipping layout that cannot be rendered"
            );
            return None;
        };
        trace!(?placement, safe_area_visible = layout.safe_area_visible, "applying layout");
        StyleSurface::new(self.mode, &mut self.host).apply(&placement);
        Some(placement)
    }
}

/// Explicit URL, or the one in the host's `background-image`.
fn resolve_image<H: Host>(explicit: Option<&str>, host: &H) -> Result<String, ConfigurationError> {
    if let Some(url) = explicit.filter(|u| !u.is_empty()) {
        return Ok(String::from(url));
    }
    let style = host.background_image().ok_or(ConfigurationError::MissingImage)?;
    let trimmed = style.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Err(ConfigurationError::MissingImage);
    }
    let url = extract_css_url(trimmed).map(String::from);
    url.ok_or(ConfigurationError::UnparsableImage { value: style })
}

/// Extract the URL from a CSS `url(...)` value.
///
/// `url(` is matched case-insensitively anywhere in `value`, the URL may be
/// wrapped in single or double quotes, and it may not itself contain quotes.
///
/// ```
/// use safecover::extract_css_url;
///
/// assert_eq!(extract_css_url(r#"url("img/a.jpg")"#), Some("img/a.jpg"));
/// assert_eq!(extract_css_url("URL(b.png) no-repeat"), Some("b.png"));
/// assert_eq!(extract_css_url("linear-gradient(red, blue)"), None);
/// ```
pub fn extract_css_url(value: &str) -> Option<&str> {
    let mut from = 0;
    while let Some(pos) = value.as_bytes()[from..]
        .windows(4)
        .position(|w| w.eq_ignore_ascii_case(b"url("))
    {
        let start = from + pos + 4;
        if let Some(url) = url_body(&value[start..]) {
            return Some(url);
        }
        from = from + pos + 1;
    }
    None
}

/// Match `["']?([^"']*)["']?\)` at the start of `rest`.
fn url_body(rest: &str) -> Option<&str> {
    let is_quote = |c: u8| c == b'"' || c == b'\'';
    let open = usize::from(rest.as_bytes().first().is_some_and(|&c| is_quote(c)));
    let body = &rest[open..];
    let bytes = body.as_bytes();
    let run = bytes.iter().position(|&c| is_quote(c)).unwrap_or(bytes.len());

    if bytes.get(run).is_some_and(|&c| is_quote(c)) && bytes.get(run + 1) == Some(&b')') {
        return Some(&body[..run]);
    }
    bytes[..run]
        .iter()
        .rposition(|&c| c == b')')
        .map(|end| &body[..end])
}

/// Controllers keyed by attachment target.
///
/// Attaching to a key that already has a controller reconfigures it instead
/// of creating a second one.
pub struct Attachments<K, H> {
    controllers: BTreeMap<K, Controller<H>>,
}

impl<K, H> Default for Attachments<K, H> {
    fn default() -> Self {
        Self {
            controllers: BTreeMap::new(),
        }
    }
}

impl<K: Ord, H: Host> Attachments<K, H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach to `key`, or apply `options` to the controller already there.
    ///
    /// When `key` is already attached, `host` is dropped unused.
    pub fn attach(
        &mut self,
        key: K,
        host: H,
        options: CoverOptions,
    ) -> Result<&mut Controller<H>, ConfigurationError> {
        match self.controllers.entry(key) {
            Entry::Occupied(entry) => {
                let controller = entry.into_mut();
                controller.configure(options)?;
                Ok(controller)
            }
            Entry::Vacant(entry) => {
                let controller = Controller::initialize(host, options)?;
                Ok(entry.insert(controller))
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&Controller<H>> {
        self.controllers.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut Controller<H>> {
        self.controllers.get_mut(key)
    }

    /// Remove and return the controller for `key`.
    pub fn detach(&mut self, key: &K) -> Option<Controller<H>> {
        self.controllers.remove(key)
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Poll every controller. Returns how many applied a new layout.
    pub fn tick(&mut self, now: Duration) -> usize {
        self.controllers
            .values_mut()
            .filter_map(|c| c.tick(now))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_url_forms() {
        assert_eq!(extract_css_url("url(a.png)"), Some("a.png"));
        assert_eq!(extract_css_url(r#"url("a.png")"#), Some("a.png"));
        assert_eq!(extract_css_url("url('a b.png')"), Some("a b.png"));
        assert_eq!(
            extract_css_url(r#"url("http://x.test/img.jpg?v=1") center / cover"#),
            Some("http://x.test/img.jpg?v=1")
        );
        assert_eq!(extract_css_url("Url(c.gif)"), Some("c.gif"));
    }

    #[test]
    fn css_url_without_match() {
        assert_eq!(extract_css_url("none"), None);
        assert_eq!(extract_css_url("url(a.png"), None);
        assert_eq!(extract_css_url(""), None);
        assert_eq!(extract_css_url("url"), None);
    }

    #[test]
    fn css_url_unquoted_takes_last_paren_of_run() {
        // No quotes: the match runs to the last ')' like a greedy pattern.
        assert_eq!(extract_css_url("url(a.png), url(b.png)"), Some("a.png), url(b.png"));
    }

    #[test]
    fn css_url_skips_unterminated_first_match() {
        assert_eq!(extract_css_url("url('x' ) url(b.png)"), Some("b.png"));
        // Without a closing quote the run swallows the rest up to the last ')'.
        assert_eq!(extract_css_url("url(\"a url(b.png)"), Some("a url(b.png"));
    }

    #[test]
    fn css_url_multibyte_is_sliced_on_boundaries() {
        assert_eq!(extract_css_url("url(bild-ü.png)"), Some("bild-ü.png"));
        assert_eq!(extract_css_url("→ url('ö.jpg')"), Some("ö.jpg"));
    }
}
