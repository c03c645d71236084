//! The QR preview controller.
//!
//! [`PreviewController`] owns all page state: the text field, the committed
//! value, the selected style, the logo, readiness, the preview slots and the
//! toast. It is changed only through the methods below, each of which maps to
//! one user action.
//!
//! # Rendering
//!
//! State changes never render inline. They queue a [`RenderJob`] on the
//! affected slot. The host either calls [`PreviewController::render_pending`]
//! to run the queue synchronously, or drains it with
//! [`PreviewController::take_render_jobs`], renders wherever it likes, and
//! reports back through [`PreviewController::complete_render`]. Readiness is
//! cleared when a main-slot job is queued and set again only when the result
//! for that exact job is mounted.
//!
//! # Example
//!
//! ```rust
//! use qreator::controller::PreviewController;
//!
//! let mut controller = PreviewController::with_defaults();
//! controller.set_input("https://example.com");
//! assert!(controller.generate());
//! assert!(!controller.can_download());
//!
//! controller.render_pending();
//! assert!(controller.can_download());
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::clipboard::ClipboardSink;
use crate::config::QreatorConfig;
use crate::error::Result;
use crate::helper::{self, ExportFormat};
use crate::logo::{self, LogoState};
use crate::render::{Artifact, RenderConfig, Renderer, StyledRenderer};
use crate::slot::{ArtifactHandle, Completion, PreviewSlot, RenderJob, SlotId};
use crate::style::{SelectedStyle, StylePreset, PRESETS};
use crate::toast::{self, Toast};
use crate::validate::{self, INVALID_INPUT_MESSAGE};

pub struct PreviewController {
    config: QreatorConfig,
    renderer: Box<dyn Renderer>,
    input: String,
    error: String,
    active_value: String,
    style: SelectedStyle,
    logo: LogoState,
    ready: bool,
    main: PreviewSlot,
    thumbnails: Vec<PreviewSlot>,
    toast: Toast,
}

impl PreviewController {
    /// Creates a controller and queues a render for every palette thumbnail.
    pub fn new(config: QreatorConfig, renderer: Box<dyn Renderer>) -> Self {
        let size = config.preview.thumbnail_size;
        let thumbnails = PRESETS
            .iter()
            .enumerate()
            .map(|(i, preset)| {
                let mut slot = PreviewSlot::new(SlotId::Thumbnail(i));
                slot.configure(Some(RenderConfig::new(preset.value, size, size)));
                slot
            })
            .collect();

        Self {
            toast: Toast::new(config.toast.duration()),
            config,
            renderer,
            input: String::new(),
            error: String::new(),
            active_value: String::new(),
            style: SelectedStyle::default(),
            logo: LogoState::default(),
            ready: false,
            main: PreviewSlot::new(SlotId::Main),
            thumbnails,
        }
    }

    /// Default configuration with the [`StyledRenderer`].
    pub fn with_defaults() -> Self {
        Self::new(QreatorConfig::default(), Box::new(StyledRenderer::new()))
    }

    /*---- Accessors ----*/

    pub fn config(&self) -> &QreatorConfig {
        &self.config
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Inline validation message; empty when there is none.
    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn active_value(&self) -> &str {
        &self.active_value
    }

    pub fn selected_style(&self) -> SelectedStyle {
        self.style
    }

    pub fn logo(&self) -> &LogoState {
        &self.logo
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn presets(&self) -> &'static [StylePreset] {
        &PRESETS
    }

    pub fn main_slot(&self) -> &PreviewSlot {
        &self.main
    }

    pub fn thumbnail(&self, index: usize) -> Option<&PreviewSlot> {
        self.thumbnails.get(index)
    }

    pub fn toast(&self) -> &Toast {
        &self.toast
    }

    /// The palette entry whose preview value equals the active value.
    ///
    /// Preview values are placeholders, so real input never matches and no
    /// tile is highlighted through this path.
    pub fn selected_preset_index(&self) -> Option<usize> {
        PRESETS
            .iter()
            .position(|preset| preset.value == self.active_value)
    }

    /*---- Input ----*/

    /// Keystroke handler. Invalid text is refused and the previous input kept.
    ///
    /// Returns `true` if the input was accepted.
    pub fn set_input(&mut self, text: &str) -> bool {
        if validate::validate(text) {
            self.input = text.to_string();
            self.error.clear();
            true
        } else {
            tracing::debug!("input rejected");
            self.error = INVALID_INPUT_MESSAGE.to_string();
            false
        }
    }

    /// Commits the current input (submit button or Enter).
    ///
    /// Resets the style to the first preset. Returns `false` and sets the
    /// inline error if the input is empty or invalid.
    pub fn generate(&mut self) -> bool {
        if self.input.is_empty() || !validate::is_valid_input(&self.input) {
            self.error = INVALID_INPUT_MESSAGE.to_string();
            return false;
        }

        tracing::debug!(len = self.input.len(), "generate");
        self.active_value = self.input.clone();
        self.style = PRESETS[0].style();
        self.error.clear();
        self.refresh_main();
        true
    }

    /// Applies a palette entry's colors without touching the active value.
    pub fn select_style(&mut self, index: usize) -> bool {
        let Some(preset) = PRESETS.get(index) else {
            tracing::warn!(index, "no such preset");
            return false;
        };
        tracing::debug!(label = preset.label, "select style");
        self.style = preset.style();
        self.refresh_main();
        true
    }

    /// Clears the input, the active value and any error.
    pub fn clear(&mut self) {
        self.input.clear();
        self.active_value.clear();
        self.error.clear();
        self.refresh_main();
    }

    /*---- Logo ----*/

    /// Turning the logo off discards any loaded logo.
    pub fn toggle_logo(&mut self, enabled: bool) {
        if self.logo.enabled() == enabled {
            return;
        }
        let before = self.logo.overlay().map(str::to_owned);
        self.logo.set_enabled(enabled);
        if self.logo.overlay() != before.as_deref() {
            self.refresh_main();
        }
    }

    /// Replaces the logo with `bytes`, or removes it when `None`.
    pub fn set_logo_file(&mut self, bytes: Option<&[u8]>) {
        let data_url = bytes.map(logo::to_data_url);
        if self.logo.set_data_url(data_url) {
            tracing::debug!(loaded = self.logo.data_url().is_some(), "logo changed");
            self.refresh_main();
        }
    }

    /// Reads a logo from disk.
    pub fn load_logo_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = std::fs::read(path)?;
        self.set_logo_file(Some(&bytes));
        Ok(())
    }

    /*---- Rendering ----*/

    fn main_config(&self) -> Option<RenderConfig> {
        if self.active_value.is_empty() {
            return None;
        }
        let preview = &self.config.preview;
        Some(
            RenderConfig::new(self.active_value.clone(), preview.width, preview.height)
                .with_style(self.style)
                .with_logo(self.logo.overlay().map(str::to_owned), self.config.logo.clone()),
        )
    }

    fn refresh_main(&mut self) {
        self.ready = false;
        let config = self.main_config();
        self.main.configure(config);
    }

    /// Drains queued jobs, main slot first.
    pub fn take_render_jobs(&mut self) -> Vec<RenderJob> {
        std::iter::once(&mut self.main)
            .chain(self.thumbnails.iter_mut())
            .filter_map(PreviewSlot::take_job)
            .collect()
    }

    /// Hands a finished job back. Stale results are dropped.
    pub fn complete_render(&mut self, job: RenderJob, result: Result<Artifact>) {
        let slot = match job.slot {
            SlotId::Main => &mut self.main,
            SlotId::Thumbnail(i) => match self.thumbnails.get_mut(i) {
                Some(slot) => slot,
                None => return,
            },
        };
        let completion = slot.complete(job.generation, result);
        if job.slot == SlotId::Main && completion == Completion::Mounted {
            tracing::debug!(generation = job.generation, "main preview ready");
            self.ready = true;
        }
    }

    /// Renders every queued job with the owned renderer.
    pub fn render_pending(&mut self) {
        for job in self.take_render_jobs() {
            let result = self.renderer.render(&job.config);
            self.complete_render(job, result);
        }
    }

    /// The main slot's artifact, if it matches the current configuration.
    fn current_handle(&self) -> Option<ArtifactHandle> {
        self.main
            .handle()
            .filter(|handle| handle.generation() == self.main.generation())
            .cloned()
    }

    /*---- Export ----*/

    pub fn can_download(&self) -> bool {
        self.ready && !self.active_value.is_empty() && self.current_handle().is_some()
    }

    /// Saves the current artifact as `<export.directory>/<export.file_name>.png`.
    ///
    /// A no-op returning `None` while not ready. Write failures become a toast.
    pub fn download(&mut self) -> Option<PathBuf> {
        if !self.can_download() {
            tracing::debug!("download ignored, preview not ready");
            return None;
        }
        let handle = self.current_handle()?;
        let export = &self.config.export;
        match handle
            .artifact()
            .save(&export.directory, &export.file_name, ExportFormat::Png)
        {
            Ok(path) => {
                tracing::info!(path = %path.display(), "downloaded");
                Some(path)
            }
            Err(err) => {
                tracing::warn!(error = %err, "download failed");
                self.toast.show(toast::DOWNLOAD_FAILED);
                None
            }
        }
    }

    /// Copies the current code to the clipboard as a PNG image.
    ///
    /// Tries the artifact's own PNG export first, then re-encodes the mounted
    /// surface. Every outcome ends in a toast; nothing is returned.
    pub fn copy_to_clipboard(&mut self, clipboard: &mut dyn ClipboardSink) {
        let handle = match self.current_handle() {
            Some(handle) if !self.active_value.is_empty() => handle,
            _ => {
                self.toast.show(toast::NOTHING_TO_COPY);
                return;
            }
        };

        let direct = handle
            .artifact()
            .export(ExportFormat::Png)
            .and_then(|png| clipboard.write_png(&png));
        match direct {
            Ok(()) => {
                self.toast.show(toast::COPIED);
                return;
            }
            Err(err) => tracing::warn!(error = %err, "artifact export copy failed, trying surface"),
        }

        let Some(surface) = self.main.surface() else {
            self.toast.show(toast::COPY_FAILED_NO_CANVAS);
            return;
        };
        let png = match helper::encode_image(surface.pixels(), ExportFormat::Png) {
            Ok(png) if !png.is_empty() => png,
            Ok(_) => {
                self.toast.show(toast::COPY_FAILED_NO_DATA);
                return;
            }
            Err(err) => {
                tracing::warn!(error = %err, "surface encoding failed");
                self.toast.show(toast::COPY_FAILED_NO_DATA);
                return;
            }
        };
        match clipboard.write_png(&png) {
            Ok(()) => self.toast.show(toast::COPIED),
            Err(err) => {
                tracing::warn!(error = %err, "clipboard write failed");
                self.toast.show(toast::COPY_FAILED);
            }
        }
    }

    /*---- Lifecycle ----*/

    /// Advances the toast timer.
    pub fn tick(&mut self, now: Instant) {
        self.toast.tick(now);
    }

    /// Cancels the toast timer.
    pub fn shutdown(&mut self) {
        self.toast.dismiss();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QreatorError;
    use image::{Rgba, RgbaImage};

    /// Fills the canvas with the background color; fails on "fail".
    struct FlatRenderer;

    impl Renderer for FlatRenderer {
        fn render(&self, config: &RenderConfig) -> Result<Artifact> {
            if config.content == "fail" {
                return Err(QreatorError::Render("scripted failure".into()));
            }
            let image = RgbaImage::from_pixel(config.width, config.height, config.style.background_color.to_rgba());
            Ok(Artifact::from_raster(config.clone(), image))
        }
    }

    /// Fails the first `failures` writes, records the rest.
    #[derive(Default)]
    struct ScriptedClipboard {
        failures: usize,
        attempts: usize,
        written: Vec<Vec<u8>>,
    }

    impl ClipboardSink for ScriptedClipboard {
        fn write_png(&mut self, png: &[u8]) -> Result<()> {
            self.attempts += 1;
            if self.failures > 0 {
                self.failures -= 1;
                return Err(QreatorError::Clipboard("busy".into()));
            }
            self.written.push(png.to_vec());
            Ok(())
        }
    }

    fn controller() -> PreviewController {
        let mut controller = PreviewController::new(QreatorConfig::default(), Box::new(FlatRenderer));
        controller.render_pending();
        controller
    }

    fn generated(text: &str) -> PreviewController {
        let mut controller = controller();
        assert!(controller.set_input(text));
        assert!(controller.generate());
        controller.render_pending();
        controller
    }

    #[test]
    fn test_generate_plain_text() {
        let mut controller = controller();
        controller.set_input("hello world");
        assert!(controller.generate());
        assert_eq!(controller.active_value(), "hello world");
        assert_eq!(controller.error(), "");
    }

    #[test]
    fn test_markup_is_refused() {
        let mut controller = controller();
        assert!(controller.set_input("safe"));
        assert!(!controller.set_input("<script>"));

        assert_eq!(controller.input(), "safe");
        assert_eq!(controller.error(), INVALID_INPUT_MESSAGE);
        assert_eq!(controller.active_value(), "");

        assert!(controller.set_input("safe again"));
        assert_eq!(controller.error(), "");
    }

    #[test]
    fn test_generate_requires_input() {
        let mut controller = controller();
        assert!(!controller.generate());
        assert_eq!(controller.error(), INVALID_INPUT_MESSAGE);
        assert_eq!(controller.active_value(), "");
        assert!(controller.take_render_jobs().is_empty());
    }

    #[test]
    fn test_empty_input_is_accepted_while_typing() {
        let mut controller = controller();
        controller.set_input("abc");
        assert!(controller.set_input(""));
        assert_eq!(controller.input(), "");
    }

    #[test]
    fn test_generate_resets_style() {
        let mut controller = generated("example.com");
        assert_eq!(controller.selected_style(), PRESETS[0].style());

        controller.select_style(3);
        assert_eq!(controller.selected_style(), PRESETS[3].style());

        controller.generate();
        assert_eq!(controller.selected_style(), PRESETS[0].style());
    }

    #[test]
    fn test_select_style_keeps_value() {
        let mut controller = generated("example.com");
        assert!(controller.select_style(2));
        assert_eq!(controller.selected_style(), PRESETS[2].style());
        assert_eq!(controller.active_value(), "example.com");
        assert!(!controller.select_style(PRESETS.len()));
    }

    #[test]
    fn test_highlight_never_matches_user_input() {
        let mut controller = generated("https://example.com");
        controller.select_style(1);
        assert_eq!(controller.selected_preset_index(), None);
    }

    #[test]
    fn test_readiness_follows_latest_render() {
        let mut controller = controller();
        controller.set_input("hello");
        controller.generate();
        assert!(!controller.is_ready());

        let first = controller.take_render_jobs();
        controller.select_style(1);
        assert!(!controller.is_ready());
        let second = controller.take_render_jobs();

        for job in first {
            let result = FlatRenderer.render(&job.config);
            controller.complete_render(job, result);
        }
        assert!(!controller.is_ready());
        assert!(controller.main_slot().handle().is_none());

        for job in second {
            let result = FlatRenderer.render(&job.config);
            controller.complete_render(job, result);
        }
        assert!(controller.is_ready());
        let artifact = controller.main_slot().handle().unwrap().artifact();
        assert_eq!(artifact.config().style, PRESETS[1].style());
    }

    #[test]
    fn test_logo_change_resets_readiness() {
        let mut controller = generated("hello");
        assert!(controller.is_ready());

        controller.toggle_logo(true);
        // Nothing loaded yet, so the configuration is unchanged.
        assert!(controller.is_ready());

        controller.set_logo_file(Some(b"not really an image"));
        assert!(!controller.is_ready());
        controller.render_pending();
        assert!(controller.is_ready());
        assert!(controller.main_slot().config().unwrap().logo.is_some());

        controller.toggle_logo(false);
        assert!(!controller.is_ready());
        assert_eq!(controller.logo().data_url(), None);
        assert!(controller.main_slot().config().unwrap().logo.is_none());
    }

    #[test]
    fn test_logo_replacement_and_removal() {
        let mut controller = generated("hello");
        controller.set_logo_file(Some(b"ignored while disabled"));
        assert_eq!(controller.logo().data_url(), None);

        controller.toggle_logo(true);
        controller.set_logo_file(Some(b"first"));
        let first = controller.logo().data_url().map(str::to_owned);
        controller.set_logo_file(Some(b"second"));
        assert_ne!(controller.logo().data_url().map(str::to_owned), first);

        controller.set_logo_file(None);
        assert_eq!(controller.logo().data_url(), None);
    }

    #[test]
    fn test_load_logo_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255])).save(&path).unwrap();

        let mut controller = generated("hello");
        controller.toggle_logo(true);
        controller.load_logo_path(&path).unwrap();
        assert!(controller.logo().data_url().unwrap().starts_with("data:image/png;base64,"));

        assert!(controller.load_logo_path(dir.path().join("missing.png")).is_err());
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([0, 128, 0, 255]));
        crate::helper::encode_image(&image, ExportFormat::Png).unwrap()
    }

    #[test]
    fn test_tall_logo_on_large_preview_renders() {
        let mut config = QreatorConfig::default();
        config.preview.width = 512;
        config.preview.height = 512;
        let mut controller = PreviewController::new(config, Box::new(StyledRenderer::new()));
        controller.set_input("hello world");
        controller.generate();
        controller.toggle_logo(true);
        controller.set_logo_file(Some(&png_bytes(10, 300)));
        controller.render_pending();

        assert!(controller.is_ready());
        let artifact = controller.main_slot().handle().unwrap().artifact();
        let placement = artifact.symbol().unwrap().layout.logo.unwrap();
        assert!(placement.hide_y <= artifact.symbol().unwrap().matrix.count());
    }

    #[test]
    fn test_svg_logo_keeps_preview() {
        let mut controller = PreviewController::with_defaults();
        controller.set_input("hello world");
        controller.generate();
        controller.toggle_logo(true);
        controller.set_logo_file(Some(b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>"));
        controller.render_pending();

        assert!(controller.is_ready());
        assert!(controller.main_slot().surface().is_some());
        let artifact = controller.main_slot().handle().unwrap().artifact();
        assert!(artifact.symbol().unwrap().layout.logo.is_none());
    }

    #[test]
    fn test_download_requires_readiness() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = QreatorConfig::default();
        config.export.directory = dir.path().to_path_buf();
        let mut controller = PreviewController::new(config, Box::new(FlatRenderer));

        assert_eq!(controller.download(), None);

        controller.set_input("hello");
        controller.generate();
        assert_eq!(controller.download(), None);

        controller.render_pending();
        let path = controller.download().unwrap();
        assert_eq!(path, dir.path().join("qr-code.png"));
        assert!(path.exists());

        controller.clear();
        assert!(!controller.is_ready());
        assert_eq!(controller.download(), None);
    }

    #[test]
    fn test_failed_render_stays_blank_and_unready() {
        let mut controller = controller();
        controller.set_input("fail");
        controller.generate();
        controller.render_pending();

        assert!(!controller.is_ready());
        assert!(controller.main_slot().surface().is_none());
        assert!(controller.toast().message().is_none());
    }

    #[test]
    fn test_copy_without_generate() {
        let mut controller = controller();
        let mut clipboard = ScriptedClipboard::default();
        controller.copy_to_clipboard(&mut clipboard);

        assert_eq!(controller.toast().message(), Some(toast::NOTHING_TO_COPY));
        assert_eq!(clipboard.attempts, 0);
    }

    #[test]
    fn test_copy_writes_png() {
        let mut controller = generated("hello");
        let mut clipboard = ScriptedClipboard::default();
        controller.copy_to_clipboard(&mut clipboard);

        assert_eq!(controller.toast().message(), Some(toast::COPIED));
        assert_eq!(clipboard.written.len(), 1);
        assert_eq!(&clipboard.written[0][1..4], b"PNG");
    }

    #[test]
    fn test_copy_falls_back_to_surface() {
        let mut controller = generated("hello");
        let mut clipboard = ScriptedClipboard {
            failures: 1,
            ..Default::default()
        };
        controller.copy_to_clipboard(&mut clipboard);

        assert_eq!(clipboard.attempts, 2);
        assert_eq!(clipboard.written.len(), 1);
        assert_eq!(controller.toast().message(), Some(toast::COPIED));
    }

    #[test]
    fn test_copy_reports_failure() {
        let mut controller = generated("hello");
        let mut clipboard = ScriptedClipboard {
            failures: 2,
            ..Default::default()
        };
        controller.copy_to_clipboard(&mut clipboard);

        assert_eq!(clipboard.attempts, 2);
        assert_eq!(controller.toast().message(), Some(toast::COPY_FAILED));
    }

    #[test]
    fn test_copy_ignores_outdated_artifact() {
        let mut controller = generated("hello");
        controller.select_style(4);
        let mut clipboard = ScriptedClipboard::default();
        controller.copy_to_clipboard(&mut clipboard);

        assert_eq!(controller.toast().message(), Some(toast::NOTHING_TO_COPY));
        assert_eq!(clipboard.attempts, 0);
    }

    #[test]
    fn test_thumbnails_render_independently() {
        let mut controller = PreviewController::new(QreatorConfig::default(), Box::new(FlatRenderer));
        let jobs = controller.take_render_jobs();
        assert_eq!(jobs.len(), PRESETS.len());
        assert!(jobs.iter().all(|job| matches!(job.slot, SlotId::Thumbnail(_))));

        for job in jobs {
            let result = FlatRenderer.render(&job.config);
            controller.complete_render(job, result);
        }
        for i in 0..PRESETS.len() {
            let slot = controller.thumbnail(i).unwrap();
            let artifact = slot.handle().unwrap().artifact();
            assert_eq!(artifact.config().content, PRESETS[i].value);
            assert_eq!(artifact.image().dimensions(), (48, 48));
        }
        // Thumbnails never gate downloads.
        assert!(!controller.is_ready());
    }

    #[test]
    fn test_toast_expires_and_shutdown_cancels() {
        let mut controller = controller();
        controller.copy_to_clipboard(&mut ScriptedClipboard::default());
        let deadline = controller.toast().deadline().unwrap();

        controller.tick(deadline);
        assert!(!controller.toast().is_visible());

        controller.copy_to_clipboard(&mut ScriptedClipboard::default());
        controller.shutdown();
        assert!(controller.toast().deadline().is_none());
    }

    #[test]
    fn test_clear_drops_in_flight_render() {
        let mut controller = controller();
        controller.set_input("hello");
        controller.generate();
        let jobs = controller.take_render_jobs();
        controller.clear();

        for job in jobs {
            let result = FlatRenderer.render(&job.config);
            controller.complete_render(job, result);
        }
        assert!(!controller.is_ready());
        assert_eq!(controller.input(), "");
        assert_eq!(controller.active_value(), "");
        assert!(controller.main_slot().surface().is_none());
    }
}
