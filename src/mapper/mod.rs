//! Wire → view mapping
//!
//! Pure, total functions: every wire value has a defined view value and
//! unknown enum values fall back to defaults instead of failing the read.
//!
//! | Wire field | View field | Fallback |
//! |------------|------------|----------|
//! | `founded_date` | `founded_year` | `0` |
//! | `biz_item` / `industry_code` | `industry` | raw code, then `""` |
//! | `hq_address` / `address` | `headquarters` | `""` |
//! | `impact_strength` | `impact_strength` | `medium` |
//! | `event_type` | `signal_sub_type` | `news` |
//! | `signal_status` | `status` | `new` |

mod corporation;
mod industry;
mod signal;

pub use corporation::{extract_founded_year, map_corporation};
pub use industry::industry_name;
pub use signal::{
    get_sub_type_from_event_type, map_category, map_impact, map_signal, map_signal_status,
    map_strength, signal_status_to_wire,
};

use kyc_types::{Corporation, CorporationWire, Page, Signal, SignalWire};

/// Map every corporation in a list page
pub fn map_corporations(page: &Page<CorporationWire>) -> Vec<Corporation> {
    page.items.iter().map(map_corporation).collect()
}

/// Map every signal in a list page
pub fn map_signals(page: &Page<SignalWire>) -> Vec<Signal> {
    page.items.iter().map(map_signal).collect()
}
