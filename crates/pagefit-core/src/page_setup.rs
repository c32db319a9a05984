//! Page setup and manual page breaks

use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Page setup for printing
///
/// `Default` mirrors an empty `<pageSetup/>` element: Letter paper, portrait,
/// 100% scale, and fit-to-page switched off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSetup {
    /// Orientation
    pub orientation: PageOrientation,
    /// Paper size
    pub paper_size: PaperSize,
    /// Fit to pages wide (0 = unbounded). Only honored when `fit_to_page` is set.
    pub fit_to_width: u32,
    /// Fit to pages tall (0 = unbounded). Only honored when `fit_to_page` is set.
    pub fit_to_height: u32,
    /// Scale percentage (10-400)
    pub scale: u32,
    /// Scale to the fit-to width/height instead of `scale`
    pub fit_to_page: bool,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            orientation: PageOrientation::Portrait,
            paper_size: PaperSize::LETTER,
            fit_to_width: 1,
            fit_to_height: 1,
            scale: 100,
            fit_to_page: false,
        }
    }
}

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum PageOrientation {
    #[default]
    Portrait,
    Landscape,
}

impl PageOrientation {
    /// OOXML attribute value
    pub fn as_str(&self) -> &'static str {
        match self {
            PageOrientation::Portrait => "portrait",
            PageOrientation::Landscape => "landscape",
        }
    }
}

impl fmt::Display for PageOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageOrientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" => Ok(PageOrientation::Portrait),
            "landscape" => Ok(PageOrientation::Landscape),
            _ => Err(Error::UnknownOrientation(s.to_string())),
        }
    }
}

/// Paper size, stored as the OOXML `ST_PaperSize` code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaperSize {
    /// Numeric code (e.g. `1` = Letter, `9` = A4)
    pub code: u16,
}

impl PaperSize {
    pub const LETTER: Self = Self { code: 1 };
    pub const TABLOID: Self = Self { code: 3 };
    pub const LEGAL: Self = Self { code: 5 };
    pub const A3: Self = Self { code: 8 };
    pub const A4: Self = Self { code: 9 };
    pub const A5: Self = Self { code: 11 };

    const NAMED: [(&'static str, PaperSize); 6] = [
        ("letter", Self::LETTER),
        ("tabloid", Self::TABLOID),
        ("legal", Self::LEGAL),
        ("a3", Self::A3),
        ("a4", Self::A4),
        ("a5", Self::A5),
    ];

    /// Create a paper size from its numeric code
    pub fn from_code(code: u16) -> Self {
        Self { code }
    }

    /// Common name for well-known sizes
    pub fn name(&self) -> Option<&'static str> {
        Self::NAMED
            .iter()
            .find(|(_, size)| size == self)
            .map(|(name, _)| *name)
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", name.to_ascii_uppercase(), self.code),
            None => write!(f, "code {}", self.code),
        }
    }
}

impl FromStr for PaperSize {
    type Err = Error;

    /// Accepts a name (`"a4"`, `"Letter"`) or a numeric code (`"9"`)
    fn from_str(s: &str) -> Result<Self, Error> {
        let key = s.trim().to_ascii_lowercase();
        if let Some((_, size)) = Self::NAMED.iter().find(|(name, _)| *name == key) {
            return Ok(*size);
        }
        key.parse::<u16>()
            .ok()
            .filter(|code| *code > 0)
            .map(Self::from_code)
            .ok_or_else(|| Error::UnknownPaperSize(s.to_string()))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PaperSize {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.name() {
            Some(name) => serializer.serialize_str(name),
            None => serializer.serialize_u16(self.code),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PaperSize {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Code(u16),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Code(code) => Ok(PaperSize::from_code(code)),
            Repr::Name(name) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Manual row page breaks
///
/// Each entry is a 1-based row number after which printing starts a new page.
/// Breaks form a set: inserting the same row twice keeps a single break, and
/// iteration is always in ascending row order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowBreaks {
    rows: BTreeSet<u32>,
}

impl RowBreaks {
    /// Create an empty break set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a break after `row`. Returns false if one was already there.
    pub fn insert(&mut self, row: u32) -> bool {
        self.rows.insert(row)
    }

    /// Check for a break after `row`
    pub fn contains(&self, row: u32) -> bool {
        self.rows.contains(&row)
    }

    /// Remove every break
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Number of breaks
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if there are no breaks
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over break rows in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.rows.iter().copied()
    }
}

impl FromIterator<u32> for RowBreaks {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for RowBreaks {
    type Item = u32;
    type IntoIter = btree_set::IntoIter<u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_page_setup_defaults() {
        let setup = PageSetup::default();
        assert_eq!(setup.orientation, PageOrientation::Portrait);
        assert_eq!(setup.paper_size, PaperSize::LETTER);
        assert_eq!(setup.scale, 100);
        assert!(!setup.fit_to_page);
    }

    #[test]
    fn test_paper_size_parse() {
        assert_eq!("A4".parse::<PaperSize>().unwrap(), PaperSize::A4);
        assert_eq!(" letter ".parse::<PaperSize>().unwrap(), PaperSize::LETTER);
        assert_eq!("9".parse::<PaperSize>().unwrap(), PaperSize::A4);
        assert_eq!("70".parse::<PaperSize>().unwrap().code, 70);
        assert!("0".parse::<PaperSize>().is_err());
        assert!("folio-ish".parse::<PaperSize>().is_err());
    }

    #[test]
    fn test_paper_size_display() {
        assert_eq!(PaperSize::A4.to_string(), "A4 (9)");
        assert_eq!(PaperSize::from_code(70).to_string(), "code 70");
    }

    #[test]
    fn test_orientation_parse() {
        assert_eq!(
            "Landscape".parse::<PageOrientation>().unwrap(),
            PageOrientation::Landscape
        );
        assert!("sideways".parse::<PageOrientation>().is_err());
    }

    #[test]
    fn test_row_breaks_are_a_set() {
        let mut breaks = RowBreaks::new();
        assert!(breaks.insert(53));
        assert!(breaks.insert(36));
        assert!(!breaks.insert(53));

        assert_eq!(breaks.len(), 2);
        assert_eq!(breaks.iter().collect::<Vec<_>>(), vec![36, 53]);

        breaks.clear();
        assert!(breaks.is_empty());
    }
}
