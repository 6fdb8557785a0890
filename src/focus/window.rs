/// Size and position of the main window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub fn sized(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

/// Window operations the focus controller needs from the front end
pub trait WindowControl {
    fn geometry(&self) -> Geometry;
    fn set_geometry(&mut self, geometry: Geometry);
    fn set_fullscreen(&mut self, enabled: bool);
    fn set_always_on_top(&mut self, enabled: bool);
    fn is_fullscreen(&self) -> bool;
    fn is_always_on_top(&self) -> bool;
}

/// Window flags for the terminal front end. Full screen means the lock screen
/// owns the whole frame; always-on-top means nothing else draws over it.
#[derive(Debug, Clone, Default)]
pub struct TerminalWindow {
    geometry: Geometry,
    fullscreen: bool,
    always_on_top: bool,
}

impl TerminalWindow {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            geometry: Geometry::sized(u32::from(width), u32::from(height)),
            ..Self::default()
        }
    }

    /// Follow terminal resizes while not locked
    pub fn observe_size(&mut self, width: u16, height: u16) {
        if !self.fullscreen {
            self.geometry = Geometry::sized(u32::from(width), u32::from(height));
        }
    }
}

impl WindowControl for TerminalWindow {
    fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
    }

    fn set_fullscreen(&mut self, enabled: bool) {
        self.fullscreen = enabled;
    }

    fn set_always_on_top(&mut self, enabled: bool) {
        self.always_on_top = enabled;
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn is_always_on_top(&self) -> bool {
        self.always_on_top
    }
}
