use serde::Deserialize;

/// Limit/offset query for the admin listings. Page-link generation is a
/// client concern; the API only reports totals.
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

impl Pagination {
    /// Clamp to something sane so a client cannot request the whole table.
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.clamp(1, 100),
            offset: self.offset.max(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        let p: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(p.limit, 20);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn clamp_bounds_limit_and_offset() {
        let p = Pagination {
            limit: 10_000,
            offset: -5,
        }
        .clamped();
        assert_eq!(p.limit, 100);
        assert_eq!(p.offset, 0);

        let p = Pagination {
            limit: 0,
            offset: 3,
        }
        .clamped();
        assert_eq!(p.limit, 1);
        assert_eq!(p.offset, 3);
    }
}
