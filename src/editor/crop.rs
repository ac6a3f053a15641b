use crate::entities::element::CropData;

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 3.0;

/// Interactive crop state for one image inside one frame.
///
/// All math happens in a cover-normalized space: at `zoom == 1.0` the
/// image exactly covers the frame (CSS `object-fit: cover`), scaled by
/// `cover_scale`. Pan offsets are pixels in frame space, measured from
/// the centered position.
#[derive(Debug, Clone)]
pub struct CropEditor {
    frame_width: f64,
    frame_height: f64,
    image_width: f64,
    image_height: f64,
    crop: CropData,
}

impl CropEditor {
    /// Dimensions must be positive; the initial crop is clamped into the
    /// valid range immediately.
    pub fn new(
        frame_width: f64,
        frame_height: f64,
        image_width: f64,
        image_height: f64,
        initial: Option<CropData>,
    ) -> Self {
        let mut editor = CropEditor {
            frame_width: frame_width.max(1.0),
            frame_height: frame_height.max(1.0),
            image_width: image_width.max(1.0),
            image_height: image_height.max(1.0),
            crop: initial.unwrap_or_default(),
        };
        editor.set_zoom(editor.crop.zoom);
        editor
    }

    /// Scale at which the image exactly covers the frame.
    pub fn cover_scale(&self) -> f64 {
        let sx = self.frame_width / self.image_width;
        let sy = self.frame_height / self.image_height;
        sx.max(sy)
    }

    /// Zoom at which the whole image is visible inside the frame
    /// (letterboxed). Always <= 1.0.
    pub fn fit_zoom(&self) -> f64 {
        let sx = self.frame_width / self.image_width;
        let sy = self.frame_height / self.image_height;
        sx.min(sy) / self.cover_scale()
    }

    /// Lower zoom bound: never below the fit zoom, never below the
    /// absolute floor.
    pub fn min_zoom(&self) -> f64 {
        self.fit_zoom().max(MIN_ZOOM)
    }

    pub fn crop(&self) -> CropData {
        self.crop
    }

    fn scaled_size(&self) -> (f64, f64) {
        let scale = self.cover_scale() * self.crop.zoom;
        (self.image_width * scale, self.image_height * scale)
    }

    /// Largest pan offset per axis that still keeps the frame covered by
    /// image (zero once the image is smaller than the frame on that axis).
    pub fn max_offsets(&self) -> (f64, f64) {
        let (scaled_w, scaled_h) = self.scaled_size();
        let max_x = ((scaled_w - self.frame_width) / 2.0).max(0.0);
        let max_y = ((scaled_h - self.frame_height) / 2.0).max(0.0);
        (max_x, max_y)
    }

    /// Clamps zoom into `[min_zoom, MAX_ZOOM]` and re-clamps the pan,
    /// since zooming out shrinks the allowed pan range.
    pub fn set_zoom(&mut self, zoom: f64) {
        let zoom = if zoom.is_finite() { zoom } else { 1.0 };
        self.crop.zoom = zoom.clamp(self.min_zoom(), MAX_ZOOM);
        self.clamp_pan();
    }

    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.crop.x = if x.is_finite() { x } else { 0.0 };
        self.crop.y = if y.is_finite() { y } else { 0.0 };
        self.clamp_pan();
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.set_pan(self.crop.x + dx, self.crop.y + dy);
    }

    /// Letterbox preset: whole image visible, centered.
    pub fn fit(&mut self) {
        self.crop = CropData { x: 0.0, y: 0.0, zoom: 1.0 };
        self.set_zoom(self.fit_zoom());
    }

    /// Cover preset: frame fully covered, centered.
    pub fn fill(&mut self) {
        self.crop = CropData { x: 0.0, y: 0.0, zoom: 1.0 };
        self.set_zoom(1.0);
    }

    /// Rescales the pan from editor frame space to the element's own
    /// dimensions, so a crop tuned in a fixed-size dialog lands the same
    /// way on the page. Both axes use the width ratio; the editor frame
    /// keeps the element's aspect, so a single ratio is exact and a
    /// mismatched frame still moves both axes in lockstep.
    pub fn to_element_space(&self, element_width: f64) -> CropData {
        let ratio = element_width / self.frame_width;
        CropData {
            x: self.crop.x * ratio,
            y: self.crop.y * ratio,
            zoom: self.crop.zoom,
        }
    }

    fn clamp_pan(&mut self) {
        let (max_x, max_y) = self.max_offsets();
        self.crop.x = self.crop.x.clamp(-max_x, max_x);
        self.crop.y = self.crop.y.clamp(-max_y, max_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide_image_editor() -> CropEditor {
        // Frame 400x300 with an 800x300 image: cover scale 1.0, fit 0.5.
        CropEditor::new(400.0, 300.0, 800.0, 300.0, None)
    }

    #[test]
    fn cover_scale_and_fit_zoom_for_wide_image() {
        let editor = wide_image_editor();
        assert_eq!(editor.cover_scale(), 1.0);
        assert_eq!(editor.fit_zoom(), 0.5);
    }

    #[test]
    fn zoom_is_clamped_between_fit_and_max() {
        let mut editor = wide_image_editor();

        editor.set_zoom(0.01);
        assert_eq!(editor.crop().zoom, 0.5);

        editor.set_zoom(10.0);
        assert_eq!(editor.crop().zoom, MAX_ZOOM);
    }

    #[test]
    fn pan_cannot_expose_background_at_cover_zoom() {
        let mut editor = wide_image_editor();
        editor.set_zoom(1.0);

        // Scaled image is 800x300; horizontal slack is (800-400)/2 = 200,
        // vertical slack is zero.
        assert_eq!(editor.max_offsets(), (200.0, 0.0));

        editor.set_pan(500.0, 50.0);
        let crop = editor.crop();
        assert_eq!(crop.x, 200.0);
        assert_eq!(crop.y, 0.0);
    }

    #[test]
    fn zooming_out_reclamps_the_pan() {
        let mut editor = wide_image_editor();
        editor.set_zoom(1.0);
        editor.set_pan(200.0, 0.0);

        editor.set_zoom(0.6);
        // Scaled width is 480; slack shrinks to 40.
        let crop = editor.crop();
        assert_eq!(crop.x, 40.0);
    }

    #[test]
    fn fit_and_fill_presets_center_the_image() {
        let mut editor = wide_image_editor();
        editor.set_zoom(2.0);
        editor.set_pan(100.0, 0.0);

        editor.fit();
        assert_eq!(editor.crop(), CropData { x: 0.0, y: 0.0, zoom: 0.5 });

        editor.fill();
        assert_eq!(editor.crop(), CropData { x: 0.0, y: 0.0, zoom: 1.0 });
    }

    #[test]
    fn element_space_scales_pan_by_the_width_ratio() {
        let mut editor = wide_image_editor();
        editor.set_zoom(1.0);
        editor.set_pan(100.0, 0.0);

        let projected = editor.to_element_space(200.0);
        assert_eq!(projected.x, 50.0);
        assert_eq!(projected.y, 0.0);
        assert_eq!(projected.zoom, 1.0);
    }

    #[test]
    fn element_space_uses_the_width_ratio_for_both_axes() {
        // Tall image so vertical pan has slack: frame 400x300, image
        // 300x900, cover scale 4/3.
        let mut editor = CropEditor::new(400.0, 300.0, 300.0, 900.0, None);
        editor.set_zoom(1.0);
        editor.set_pan(100.0, 80.0);
        assert_eq!(editor.crop().x, 0.0);
        assert_eq!(editor.crop().y, 80.0);

        editor.set_zoom(2.0);
        editor.set_pan(100.0, 80.0);

        let projected = editor.to_element_space(200.0);
        assert_eq!(projected.x, 50.0);
        assert_eq!(projected.y, 40.0);
    }

    #[test]
    fn square_image_in_square_frame_has_fit_equal_to_cover() {
        let editor = CropEditor::new(300.0, 300.0, 600.0, 600.0, None);
        assert_eq!(editor.cover_scale(), 0.5);
        assert_eq!(editor.fit_zoom(), 1.0);
        assert_eq!(editor.min_zoom(), 1.0);
    }
}
