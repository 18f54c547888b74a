/// # Quirks
///
/// Interpreters have never quite agreed on a couple of the arithmetic opcodes.
/// The defaults follow the behaviour most modern programs expect.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Quirks {
    /// `8XY1`, `8XY2` and `8XY3` reset VF to 0 after the operation
    pub logic_resets_flag: bool,
    /// `8XY6` and `8XYE` load Vy into Vx before shifting it
    pub shift_uses_vy: bool,
}

/// # Config
///
/// Runtime configuration for a Chip-8.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub quirks: Quirks,
    /// Seed for `CXNN`; seeded from the OS when `None`
    pub seed: Option<u64>,
}

impl Config {
    pub fn with_quirks(self, quirks: Quirks) -> Self {
        Config { quirks, ..self }
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Config {
            seed: Some(seed),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_quirks() {
        let config = Config::default();
        assert!(!config.quirks.logic_resets_flag);
        assert!(!config.quirks.shift_uses_vy);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_builders_keep_other_fields() {
        let quirks = Quirks {
            logic_resets_flag: true,
            shift_uses_vy: false,
        };
        let config = Config::default().with_seed(7).with_quirks(quirks);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.quirks, quirks);
    }
}
