// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fast record scanner using SIMD-accelerated byte searching
//!
//! Finds record boundaries in the DATA section without tokenizing arguments.

use memchr::{memchr, memchr3, memmem};
use rustc_hash::FxHashMap;

/// Record index mapping id to byte offsets
pub type EntityIndex = FxHashMap<u32, (usize, usize)>;

/// One record located by the scanner
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScannedRecord<'a> {
    pub id: u32,
    pub type_name: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Fast record scanner for STEP files
///
/// Uses memchr to jump between statement delimiters and only inspects a
/// `#` that starts a statement.
pub struct EntityScanner<'a> {
    content: &'a str,
    pos: usize,
    truncated: bool,
}

impl<'a> EntityScanner<'a> {
    /// Create a new scanner for the given content
    ///
    /// Starts after `DATA;` when a header is present, otherwise at the
    /// beginning of the text.
    pub fn new(content: &'a str) -> Self {
        let pos = content.find("DATA;").map(|p| p + 5).unwrap_or(0);

        Self {
            content,
            pos,
            truncated: false,
        }
    }

    /// Whether scanning stopped inside a record without `;` or an open comment
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Scan to find the next record
    ///
    /// A record header is only recognized where a statement may begin: at
    /// the start of the section or after a `;`, with blanks and comments in
    /// between. Text inside comments and strings is never inspected.
    pub fn next_record(&mut self) -> Option<ScannedRecord<'a>> {
        let bytes = self.content.as_bytes();
        let mut at_start = true;

        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b' ' | b'\t' | b'\r' | b'\n' => self.pos += 1,
                b'/' if bytes.get(self.pos + 1) == Some(&b'*') => {
                    let Some(close) = memmem::find(&bytes[self.pos + 2..], b"*/") else {
                        self.truncated = true;
                        return None;
                    };
                    self.pos += close + 4;
                }
                b'\'' => {
                    at_start = false;
                    self.skip_string();
                }
                b';' => {
                    at_start = true;
                    self.pos += 1;
                }
                b'#' if at_start => {
                    let start = self.pos;
                    let Some((id, type_name)) = self.record_header() else {
                        at_start = false;
                        continue;
                    };

                    let Some(end) = self.find_record_end() else {
                        self.truncated = true;
                        return None;
                    };

                    return Some(ScannedRecord {
                        id,
                        type_name,
                        start,
                        end,
                    });
                }
                _ => {
                    at_start = false;
                    self.pos += 1;
                    self.pos = match memchr3(b';', b'\'', b'/', &bytes[self.pos..]) {
                        Some(offset) => self.pos + offset,
                        None => bytes.len(),
                    };
                }
            }
        }

        None
    }

    /// Parse `#id = TYPE` with the cursor on the `#`
    fn record_header(&mut self) -> Option<(u32, &'a str)> {
        let bytes = self.content.as_bytes();
        self.pos += 1;

        let id_start = self.pos;
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        let id = self.content[id_start..self.pos].parse::<u32>().ok()?;

        self.skip_blanks();
        if bytes.get(self.pos) != Some(&b'=') {
            return None;
        }
        self.pos += 1;
        self.skip_blanks();

        let type_start = self.pos;
        while self.pos < bytes.len()
            && (bytes[self.pos].is_ascii_alphanumeric() || bytes[self.pos] == b'_')
        {
            self.pos += 1;
        }
        if self.pos == type_start {
            return None;
        }

        Some((id, &self.content[type_start..self.pos]))
    }

    /// Step over a quoted string, including doubled quotes
    fn skip_string(&mut self) {
        let bytes = self.content.as_bytes();
        self.pos += 1;

        while let Some(offset) = memchr(b'\'', &bytes[self.pos..]) {
            self.pos += offset + 1;
            if bytes.get(self.pos) != Some(&b'\'') {
                return;
            }
            self.pos += 1;
        }

        self.pos = bytes.len();
    }

    fn skip_blanks(&mut self) {
        let bytes = self.content.as_bytes();
        while self.pos < bytes.len() && matches!(bytes[self.pos], b' ' | b'\t' | b'\r' | b'\n') {
            self.pos += 1;
        }
    }

    /// Find the end of a record (semicolon), skipping strings and comments
    fn find_record_end(&mut self) -> Option<usize> {
        let bytes = self.content.as_bytes();
        let mut in_string = false;

        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b'\'' => {
                    if in_string && bytes.get(self.pos + 1) == Some(&b'\'') {
                        self.pos += 2;
                        continue;
                    }
                    in_string = !in_string;
                }
                b'/' if !in_string && bytes.get(self.pos + 1) == Some(&b'*') => {
                    let close = memmem::find(&bytes[self.pos + 2..], b"*/")?;
                    self.pos += close + 4;
                    continue;
                }
                b';' if !in_string => {
                    self.pos += 1;
                    return Some(self.pos);
                }
                _ => {}
            }
            self.pos += 1;
        }

        None
    }

    /// Build an index of all records (id -> byte offsets)
    pub fn build_index(content: &'a str) -> EntityIndex {
        let mut scanner = Self::new(content);
        let mut index = FxHashMap::default();

        while let Some(record) = scanner.next_record() {
            index.insert(record.id, (record.start, record.end));
        }

        index
    }

    /// Count records by type name
    pub fn count_by_type(content: &'a str) -> FxHashMap<String, usize> {
        let mut scanner = Self::new(content);
        let mut counts: FxHashMap<String, usize> = FxHashMap::default();

        while let Some(record) = scanner.next_record() {
            *counts.entry(record.type_name.to_uppercase()).or_insert(0) += 1;
        }

        counts
    }
}

impl<'a> Iterator for EntityScanner<'a> {
    type Item = ScannedRecord<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_IFC: &str = r#"ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [ReferenceView]'),'2;1');
FILE_NAME('test.ifc','2024-01-01T00:00:00',('Author'),('Org'),'Preprocessor','App','');
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCCLASSIFICATION('CSI',$,$,'MasterFormat',$,$,$);
#2=IFCCLASSIFICATIONREFERENCE($,'04 22 00','Concrete; unit masonry',#1,$,$);
/* #9=IFCMATERIAL('commented out',$,$); */
  #3 = IFCMATERIAL('Brick',$,$);
#4=IFCRELASSOCIATESMATERIAL('2Xq$1aR0z7wfm7nK4gHKkM',$,$,$,(#5),#3);
ENDSEC;
END-ISO-10303-21;
"#;

    #[test]
    fn test_scanner_finds_records() {
        let records: Vec<_> = EntityScanner::new(TEST_IFC)
            .map(|r| (r.id, r.type_name.to_string()))
            .collect();

        assert_eq!(records.len(), 4);
        assert_eq!(records[0], (1, "IFCCLASSIFICATION".to_string()));
        assert_eq!(records[2], (3, "IFCMATERIAL".to_string()));
        assert_eq!(records[3], (4, "IFCRELASSOCIATESMATERIAL".to_string()));
    }

    #[test]
    fn test_semicolon_inside_string() {
        let mut scanner = EntityScanner::new(TEST_IFC);
        scanner.next_record();
        let record = scanner.next_record().unwrap();
        let text = &TEST_IFC[record.start..record.end];
        assert!(text.ends_with("#1,$,$);"));
    }

    #[test]
    fn test_no_header() {
        let content = "#10=IFCMATERIAL('A',$,$);\n#11=IFCMATERIAL('B',$,$);";
        let index = EntityScanner::build_index(content);
        assert_eq!(index.len(), 2);
        assert_eq!(index[&10], (0, 25));
    }

    #[test]
    fn test_truncated_record() {
        let mut scanner = EntityScanner::new("#1=IFCMATERIAL('A',$,$);\n#2=IFCMATERIAL('B'");
        assert!(scanner.next_record().is_some());
        assert!(scanner.next_record().is_none());
        assert!(scanner.is_truncated());
    }

    #[test]
    fn test_multiline_comment_hides_records() {
        let content = "DATA;\n/* old\n#9=IFCMATERIAL('ghost',$,$);\n*/\n#1=IFCMATERIAL('A',$,$);\nENDSEC;";
        let ids: Vec<_> = EntityScanner::new(content).map(|r| r.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_record_after_same_line_comment() {
        let content = "DATA;\n/* c */ #1=IFCMATERIAL('A',$,$);\n#2=IFCMATERIAL('B',$,$); /* d */ #3=IFCMATERIAL('C',$,$);\nENDSEC;";
        let records: Vec<_> = EntityScanner::new(content).collect();
        let ids: Vec<_> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(content[records[0].start..].starts_with("#1="));
    }

    #[test]
    fn test_quotes_inside_records() {
        let content = "#1=IFCMATERIAL('A;#5=X(',$,$);\n#2=IFCMATERIAL('It''s',$,$);";
        let ids: Vec<_> = EntityScanner::new(content).map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_reference_mid_statement_is_not_a_record() {
        let content = "DATA;\nFOO #7=BAR;\n#1=IFCMATERIAL('A',$,$);";
        let ids: Vec<_> = EntityScanner::new(content).map(|r| r.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_unterminated_comment_truncates() {
        let mut scanner = EntityScanner::new("#1=IFCMATERIAL('A',$,$);\n/* #2=IFCMATERIAL('B',$,$);");
        assert!(scanner.next_record().is_some());
        assert!(scanner.next_record().is_none());
        assert!(scanner.is_truncated());
    }

    #[test]
    fn test_count_by_type() {
        let counts = EntityScanner::count_by_type(TEST_IFC);
        assert_eq!(counts.get("IFCMATERIAL"), Some(&1));
        assert_eq!(counts.get("IFCCLASSIFICATION"), Some(&1));
    }
}
