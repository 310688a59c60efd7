//! View modes and the media-type filter.

/// Which collection the grid is showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewerMode {
    /// Every category at once.
    #[default]
    Overview,
    /// One category tab.
    Category(String),
    /// One favorite list (or the list picker when `None`).
    Favorites(Option<String>),
    /// One preset folder (or the folder picker when `None`).
    Presets(Option<String>),
}

impl ViewerMode {
    /// Slot key of the active category, when in category mode.
    #[must_use]
    pub fn category_key(&self) -> Option<&str> {
        match self {
            ViewerMode::Category(key) => Some(key),
            _ => None,
        }
    }
}

/// Media-type restriction applied on top of the search query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaFilter {
    #[default]
    All,
    Images,
    Videos,
}

impl MediaFilter {
    /// Next filter in the All → Images → Videos cycle.
    #[must_use]
    pub fn cycled(self) -> Self {
        match self {
            MediaFilter::All => MediaFilter::Images,
            MediaFilter::Images => MediaFilter::Videos,
            MediaFilter::Videos => MediaFilter::All,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            MediaFilter::All => "All",
            MediaFilter::Images => "Images",
            MediaFilter::Videos => "Videos",
        }
    }

    #[must_use]
    pub fn accepts(self, kind: crate::domain::MediaKind) -> bool {
        match self {
            MediaFilter::All => true,
            MediaFilter::Images => kind.is_image(),
            MediaFilter::Videos => kind.is_video(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MediaKind;

    #[test]
    fn filter_cycles_through_all_three() {
        let f = MediaFilter::All;
        assert_eq!(f.cycled(), MediaFilter::Images);
        assert_eq!(f.cycled().cycled(), MediaFilter::Videos);
        assert_eq!(f.cycled().cycled().cycled(), MediaFilter::All);
    }

    #[test]
    fn filter_acceptance() {
        assert!(MediaFilter::All.accepts(MediaKind::Other));
        assert!(MediaFilter::Images.accepts(MediaKind::Image));
        assert!(!MediaFilter::Images.accepts(MediaKind::Video));
        assert!(MediaFilter::Videos.accepts(MediaKind::Video));
    }
}
