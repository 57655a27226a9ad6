/// Framework tunables shared by hosts and content loaders.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HookConfig {
    /// How many nested skill gains a single commit may trigger before the
    /// pipeline stops cascading into `on_gain_skill`.
    pub max_cascade_depth: u32,
    /// Reject catalog entries naming unknown components instead of skipping them.
    pub strict_attach: bool,
}

impl HookConfig {
    pub const DEFAULT_MAX_CASCADE_DEPTH: u32 = 8;

    pub fn new() -> Self {
        Self {
            max_cascade_depth: Self::DEFAULT_MAX_CASCADE_DEPTH,
            strict_attach: true,
        }
    }

    pub fn with_max_cascade_depth(mut self, depth: u32) -> Self {
        self.max_cascade_depth = depth;
        self
    }

    pub fn with_strict_attach(mut self, strict: bool) -> Self {
        self.strict_attach = strict;
        self
    }
}

impl Default for HookConfig {
    fn default() -> Self {
        Self::new()
    }
}
