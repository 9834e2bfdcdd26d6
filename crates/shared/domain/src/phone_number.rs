//! Phone number rental row used by the diagnostic scripts.
//!
//! Unrelated to the registration flow; it only exists so the diagnostics
//! have a concrete shape to insert and read back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row in the phone numbers table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumberRecord {
    pub phone_number: String,
    pub rent_id: String,
    pub service: String,
    pub country: String,
    pub end_date: DateTime<Utc>,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_round_trip_from_row() {
        let row = serde_json::json!({
            "phone_number": "+4915112345678",
            "rent_id": "r-1",
            "service": "whatsapp",
            "country": "DE",
            "end_date": "2024-06-16T00:00:00Z",
            "status": "active",
        });

        let record: PhoneNumberRecord = serde_json::from_value(row.clone()).unwrap();
        assert_eq!(record.rent_id, "r-1");
        assert_eq!(serde_json::to_value(&record).unwrap(), row);
    }
}
