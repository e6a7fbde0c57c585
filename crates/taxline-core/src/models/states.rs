//! Indian state registry for interstate checks.
//!
//! Destination states arrive as free-form strings: sometimes the GST
//! alpha code ("KA"), sometimes the full name ("Karnataka"), in any
//! case. Normalization maps both spellings onto the alpha code so the
//! interstate comparison is exact.

use std::collections::HashMap;

use lazy_static::lazy_static;

/// (alpha code, full name) pairs from the GST state registry.
const STATES: &[(&str, &str)] = &[
    ("AN", "Andaman and Nicobar Islands"),
    ("AP", "Andhra Pradesh"),
    ("AR", "Arunachal Pradesh"),
    ("AS", "Assam"),
    ("BR", "Bihar"),
    ("CH", "Chandigarh"),
    ("CG", "Chhattisgarh"),
    ("DN", "Dadra and Nagar Haveli and Daman and Diu"),
    ("DL", "Delhi"),
    ("GA", "Goa"),
    ("GJ", "Gujarat"),
    ("HR", "Haryana"),
    ("HP", "Himachal Pradesh"),
    ("JK", "Jammu and Kashmir"),
    ("JH", "Jharkhand"),
    ("KA", "Karnataka"),
    ("KL", "Kerala"),
    ("LA", "Ladakh"),
    ("LD", "Lakshadweep"),
    ("MP", "Madhya Pradesh"),
    ("MH", "Maharashtra"),
    ("MN", "Manipur"),
    ("ML", "Meghalaya"),
    ("MZ", "Mizoram"),
    ("NL", "Nagaland"),
    ("OD", "Odisha"),
    ("PY", "Puducherry"),
    ("PB", "Punjab"),
    ("RJ", "Rajasthan"),
    ("SK", "Sikkim"),
    ("TN", "Tamil Nadu"),
    ("TS", "Telangana"),
    ("TR", "Tripura"),
    ("UP", "Uttar Pradesh"),
    ("UK", "Uttarakhand"),
    ("WB", "West Bengal"),
];

lazy_static! {
    static ref BY_KEY: HashMap<String, &'static str> = {
        let mut map = HashMap::new();
        for (code, name) in STATES {
            map.insert(code.to_lowercase(), *code);
            map.insert(name.to_lowercase(), *code);
        }
        map
    };
}

/// Normalize a state name or alpha code to the registry code.
/// Returns `None` for empty or unrecognized input.
pub fn normalize(state: &str) -> Option<&'static str> {
    let key = state.trim().to_lowercase();
    if key.is_empty() {
        return None;
    }
    BY_KEY.get(&key).copied()
}

/// Full name for a registry code.
pub fn name_of(code: &str) -> Option<&'static str> {
    let code = code.trim().to_uppercase();
    STATES.iter().find(|(c, _)| *c == code).map(|(_, n)| *n)
}
