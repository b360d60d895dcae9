use encoding_rs::EUC_KR;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text encodings every dataset is written in. Spreadsheet tools on Korean
/// Windows installs open the legacy code page by default; others need the BOM
/// to detect UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf8Bom,
    /// CP949, written through the WHATWG `EUC-KR` encoder (a CP949 superset).
    Cp949,
}

impl TextEncoding {
    pub const ALL: [TextEncoding; 3] = [
        TextEncoding::Utf8,
        TextEncoding::Utf8Bom,
        TextEncoding::Cp949,
    ];

    /// Suffix appended to the dataset's base file name.
    #[must_use]
    pub fn file_suffix(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "_utf8",
            TextEncoding::Utf8Bom => "_utf8sig",
            TextEncoding::Cp949 => "",
        }
    }

    #[must_use]
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
            TextEncoding::Utf8Bom => {
                let mut out = Vec::with_capacity(UTF8_BOM.len() + text.len());
                out.extend_from_slice(UTF8_BOM);
                out.extend_from_slice(text.as_bytes());
                out
            }
            TextEncoding::Cp949 => {
                let (bytes, _, had_unmappable) = EUC_KR.encode(text);
                if had_unmappable {
                    tracing::warn!(
                        "some characters have no CP949 mapping; written as numeric character references"
                    );
                }
                bytes.into_owned()
            }
        }
    }
}

/// Decode a dataset file without knowing which encoding produced it.
///
/// A leading BOM wins; otherwise valid UTF-8 is taken as-is and anything
/// else is read as CP949.
pub(crate) fn decode(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        return String::from_utf8_lossy(rest).into_owned();
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_owned(),
        Err(_) => {
            let (text, had_errors) = EUC_KR.decode_without_bom_handling(bytes);
            if had_errors {
                tracing::warn!("input is neither UTF-8 nor CP949; invalid bytes replaced");
            }
            text.into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_bom_prefixes_marker() {
        let bytes = TextEncoding::Utf8Bom.encode("id;name\n");
        assert_eq!(&bytes[..3], UTF8_BOM);
        assert_eq!(&bytes[3..], b"id;name\n");
    }

    #[test]
    fn cp949_encodes_hangul_as_two_bytes() {
        let bytes = TextEncoding::Cp949.encode("삼성");
        assert_eq!(bytes.len(), 4);
        assert_ne!(bytes, "삼성".as_bytes());
    }

    #[test]
    fn cp949_replaces_unmappable_with_reference() {
        let bytes = TextEncoding::Cp949.encode("a😀");
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "a&#128512;");
    }

    #[test]
    fn decode_detects_each_encoding() {
        let text = "id;brand\n1;다이소\n";
        for encoding in TextEncoding::ALL {
            assert_eq!(decode(&encoding.encode(text)), text, "{encoding:?}");
        }
    }

    #[test]
    fn suffixes_are_distinct() {
        assert_eq!(TextEncoding::Utf8.file_suffix(), "_utf8");
        assert_eq!(TextEncoding::Utf8Bom.file_suffix(), "_utf8sig");
        assert_eq!(TextEncoding::Cp949.file_suffix(), "");
    }
}
