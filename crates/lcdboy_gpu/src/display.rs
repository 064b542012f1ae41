/// The display sink that receives LCD power transitions.
pub trait Display {
    fn enable_lcd(&mut self);
    fn disable_lcd(&mut self);
}

/// A sink that ignores every notification.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullDisplay;

impl Display for NullDisplay {
    fn enable_lcd(&mut self) {}

    fn disable_lcd(&mut self) {}
}
