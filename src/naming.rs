//! Identifier rules per database: length limits, the encodings lengths
//! are measured in, and safe truncation.
//!
//! Validation stays out of the generator on purpose. The rules are
//! checked before a name reaches a query tree, and a violation is a
//! [`Problem`] the caller decides what to do with: truncate, report or
//! fail.

use crate::problem::{Problem, Problems};

/// The unit identifier lengths are measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameEncoding {
    /// Bytes of UTF-8.
    #[default]
    Utf8,
    /// Characters of a single-byte character set.
    SingleByte,
    /// UTF-16 code units.
    Utf16,
}

impl NameEncoding {
    /// Resolves the encoding name a database reports for itself.
    ///
    /// Unknown encodings push an [`UnsupportedNameEncoding`] warning and
    /// fall back to UTF-8; an imprecise length measurement beats refusing
    /// to work with the database at all.
    ///
    /// [`UnsupportedNameEncoding`]: Problem::UnsupportedNameEncoding
    pub fn from_database(declared: &str, problems: &mut Problems) -> Self {
        let normalized: String = declared
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        match normalized.as_str() {
            "UTF8" | "UNICODE" | "UTF8MB4" => Self::Utf8,
            "LATIN1" | "ISO88591" | "SQLASCII" | "WIN1252" => Self::SingleByte,
            "UTF16" | "UCS2" => Self::Utf16,
            _ => {
                problems.push(Problem::UnsupportedNameEncoding {
                    encoding: declared.to_owned(),
                });

                Self::Utf8
            }
        }
    }

    /// The length of `name` in the units of this encoding.
    pub fn measure(self, name: &str) -> usize {
        match self {
            Self::Utf8 => name.len(),
            Self::SingleByte => name.chars().count(),
            Self::Utf16 => name.encode_utf16().count(),
        }
    }
}

/// Identifier rules of one database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingProperties {
    /// Hard length limit in units of `encoding`, `None` when unbounded.
    pub max_identifier_length: Option<usize>,
    pub encoding: NameEncoding,
    pub is_case_sensitive: bool,
}

impl NamingProperties {
    /// PostgreSQL truncates identifiers to `NAMEDATALEN - 1` = 63 bytes,
    /// measured in the server encoding.
    pub fn postgres(server_encoding: &str, problems: &mut Problems) -> Self {
        Self {
            max_identifier_length: Some(63),
            encoding: NameEncoding::from_database(server_encoding, problems),
            is_case_sensitive: true,
        }
    }

    /// SQLite has no practical identifier length limit.
    pub fn sqlite() -> Self {
        Self {
            max_identifier_length: None,
            encoding: NameEncoding::Utf8,
            is_case_sensitive: false,
        }
    }

    /// The length of `name` under the measurement rules of this database.
    pub fn measure(&self, name: &str) -> usize {
        self.encoding.measure(name)
    }

    /// Checks `name` against the identifier length limit.
    pub fn validate(&self, name: &str) -> Result<(), Problem> {
        let length = self.measure(name);

        match self.max_identifier_length {
            Some(limit) if length > limit => Err(Problem::NameTooLong {
                name: name.to_owned(),
                length,
                limit,
            }),
            _ => Ok(()),
        }
    }

    /// The longest prefix of `name` within the identifier limit, cut on a
    /// character boundary so the result is always valid UTF-8.
    pub fn truncate<'a>(&self, name: &'a str) -> &'a str {
        let Some(limit) = self.max_identifier_length else {
            return name;
        };

        match self.encoding {
            NameEncoding::Utf8 => {
                if name.len() <= limit {
                    return name;
                }

                let mut end = limit;

                while !name.is_char_boundary(end) {
                    end -= 1;
                }

                &name[..end]
            }
            NameEncoding::SingleByte => match name.char_indices().nth(limit) {
                Some((index, _)) => &name[..index],
                None => name,
            },
            NameEncoding::Utf16 => {
                let mut units = 0;

                for (index, c) in name.char_indices() {
                    if units + c.len_utf16() > limit {
                        return &name[..index];
                    }

                    units += c.len_utf16();
                }

                name
            }
        }
    }

    /// Whether two identifiers name the same entity under the case rules
    /// of this database.
    pub fn names_collide(&self, left: &str, right: &str) -> bool {
        if self.is_case_sensitive {
            left == right
        } else {
            // SQLite folds ASCII case only.
            left.eq_ignore_ascii_case(right)
        }
    }
}
