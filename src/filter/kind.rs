use std::fmt;

/// Every stream filter named by the PDF standard.
///
/// The discriminants are stable and double as registry slot indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum FilterKind {
    AsciiHexDecode = 0,
    Ascii85Decode = 1,
    LzwDecode = 2,
    FlateDecode = 3,
    RunLengthDecode = 4,
    CcittFaxDecode = 5,
    Jbig2Decode = 6,
    DctDecode = 7,
    JpxDecode = 8,
    Crypt = 9,
}

impl FilterKind {
    pub const ALL: [FilterKind; 10] = [
        FilterKind::AsciiHexDecode,
        FilterKind::Ascii85Decode,
        FilterKind::LzwDecode,
        FilterKind::FlateDecode,
        FilterKind::RunLengthDecode,
        FilterKind::CcittFaxDecode,
        FilterKind::Jbig2Decode,
        FilterKind::DctDecode,
        FilterKind::JpxDecode,
        FilterKind::Crypt,
    ];

    /// Filter name as written after `/Filter` in a stream dictionary
    pub fn name(self) -> &'static str {
        match self {
            FilterKind::AsciiHexDecode => "ASCIIHexDecode",
            FilterKind::Ascii85Decode => "ASCII85Decode",
            FilterKind::LzwDecode => "LZWDecode",
            FilterKind::FlateDecode => "FlateDecode",
            FilterKind::RunLengthDecode => "RunLengthDecode",
            FilterKind::CcittFaxDecode => "CCITTFaxDecode",
            FilterKind::Jbig2Decode => "JBIG2Decode",
            FilterKind::DctDecode => "DCTDecode",
            FilterKind::JpxDecode => "JPXDecode",
            FilterKind::Crypt => "Crypt",
        }
    }

    /// Resolve a filter name, including the abbreviations allowed in inline images
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "ASCIIHexDecode" | "AHx" => FilterKind::AsciiHexDecode,
            "ASCII85Decode" | "A85" => FilterKind::Ascii85Decode,
            "LZWDecode" | "LZW" => FilterKind::LzwDecode,
            "FlateDecode" | "Fl" => FilterKind::FlateDecode,
            "RunLengthDecode" | "RL" => FilterKind::RunLengthDecode,
            "CCITTFaxDecode" | "CCF" => FilterKind::CcittFaxDecode,
            "JBIG2Decode" => FilterKind::Jbig2Decode,
            "DCTDecode" | "DCT" => FilterKind::DctDecode,
            "JPXDecode" => FilterKind::JpxDecode,
            "Crypt" => FilterKind::Crypt,
            _ => return None,
        };
        Some(kind)
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
