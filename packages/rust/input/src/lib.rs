//! Company list input.
//!
//! Reads the analyst's company file (`Name (https://url)` per line) into an
//! ordered [`CompanyList`]. Malformed lines are skipped without error.

mod parser;

use std::path::Path;

use tracing::{debug, instrument};

use founderlens_shared::{CompanyList, FounderLensError, Result};

pub use parser::parse_companies;

/// Read and parse a company file.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_companies(path: &Path) -> Result<CompanyList> {
    let content = std::fs::read_to_string(path).map_err(|e| FounderLensError::io(path, e))?;
    let companies = parse_companies(&content);
    debug!(count = companies.len(), "parsed company file");
    Ok(companies)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_from_disk() {
        let path = std::env::temp_dir().join(format!("fl-companies-{}.txt", uuid::Uuid::now_v7()));
        std::fs::write(
            &path,
            "Airbnb (https://airbnb.com)\n\nnot a company line\nStripe (https://stripe.com)\n",
        )
        .unwrap();

        let companies = load_companies(&path).unwrap();
        assert_eq!(companies.len(), 2);
        assert_eq!(companies["Airbnb"], "https://airbnb.com");
        assert_eq!(companies["Stripe"], "https://stripe.com");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let path = std::env::temp_dir().join(format!("fl-missing-{}.txt", uuid::Uuid::now_v7()));
        let err = load_companies(&path).unwrap_err();
        assert!(matches!(err, FounderLensError::Io { .. }));
    }
}
