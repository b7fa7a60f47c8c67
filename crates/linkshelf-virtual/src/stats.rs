/// Running counters for one list, in the spirit of a devtools HUD.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListStats {
    /// Completed windowing passes.
    pub passes: u64,
    /// Elements produced by the render callback.
    pub rendered: u64,
    /// Elements removed because they left the window or were cleared.
    pub removed: u64,
    /// Elements whose deferred content was promoted.
    pub promoted: u64,
    /// Scroll or resize events dropped by the throttle.
    pub throttled: u64,
}
