//! Named, reusable bundles of rendering options.

use crate::options::OptionMap;

/// A named bundle of default and override rendering options.
///
/// Presets carry two immutable layers: [`default_options`] at the lowest
/// precedence and [`overrides`] above it. [`options`] yields the merged
/// view. No value validation happens here; presets are trusted to emit
/// well-formed flag/value pairs.
///
/// The orchestrator layers its own directly-set options on top of the
/// merged view, so those always win over anything a preset provides.
///
/// [`default_options`]: Preset::default_options
/// [`overrides`]: Preset::overrides
/// [`options`]: Preset::options
pub trait Preset: Send + Sync {
    /// Lowest-precedence layer.
    fn default_options(&self) -> OptionMap {
        OptionMap::new()
    }

    /// Explicit layer; wins over the defaults within the preset.
    fn overrides(&self) -> OptionMap;

    /// Merged view of both layers.
    fn options(&self) -> OptionMap {
        self.default_options().merge(&self.overrides())
    }
}

/// A4 portrait for on-screen content: named page format plus a viewport
/// matching A4 at 96 DPI.
#[derive(Debug, Clone, Copy, Default)]
pub struct A4PortraitWeb;

impl Preset for A4PortraitWeb {
    fn overrides(&self) -> OptionMap {
        let mut options = OptionMap::new();
        options.set_value("--pageFormat", "A4");
        options.set_value("--viewportWidth", "794");
        options.set_value("--viewportHeight", "1122");
        options
    }
}

/// A4 portrait for print production: explicit page dimensions with a margin
/// bleed added on every edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct A4PortraitPrint;

impl A4PortraitPrint {
    /// Margin bleed, in mm.
    const BLEED: u32 = 5;
}

impl Preset for A4PortraitPrint {
    fn overrides(&self) -> OptionMap {
        let mut options = OptionMap::new();
        options.set_value("--pageWidth", (210 + 2 * Self::BLEED).to_string());
        options.set_value("--pageHeight", (297 + 2 * Self::BLEED).to_string());
        options.set_value("--viewportWidth", "794");
        options.set_value("--viewportHeight", "1122");
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct LayeredPreset;

    impl Preset for LayeredPreset {
        fn default_options(&self) -> OptionMap {
            let mut options = OptionMap::new();
            options.set_value("--pageFormat", "Letter");
            options.set_value("--viewportWidth", "640");
            options
        }

        fn overrides(&self) -> OptionMap {
            let mut options = OptionMap::new();
            options.set_value("--pageFormat", "A4");
            options
        }
    }

    #[test]
    fn overrides_win_over_defaults() {
        let options = LayeredPreset.options();
        assert_eq!(
            options.get("--pageFormat").map(|e| e.render()),
            Some("--pageFormat=A4".to_string())
        );
        // Keys only present in the defaults survive the merge.
        assert_eq!(
            options.get("--viewportWidth").map(|e| e.render()),
            Some("--viewportWidth=640".to_string())
        );
    }

    #[test]
    fn a4_portrait_web_contents() {
        let options = A4PortraitWeb.options();
        assert_eq!(
            options.render(),
            vec!["--pageFormat=A4", "--viewportWidth=794", "--viewportHeight=1122"]
        );
    }

    #[test]
    fn a4_portrait_print_adds_bleed() {
        let options = A4PortraitPrint.options();
        assert_eq!(
            options.get("--pageWidth").map(|e| e.render()),
            Some("--pageWidth=220".to_string())
        );
        assert_eq!(
            options.get("--pageHeight").map(|e| e.render()),
            Some("--pageHeight=307".to_string())
        );
    }
}
