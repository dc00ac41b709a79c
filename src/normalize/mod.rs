//! Field normalizers.
//!
//! Synonym tables live in [`synonyms`]; the per-field recoders that apply them
//! (and their fallback policies) live in [`recode`].

pub mod recode;
pub mod synonyms;

pub use recode::{
    Season, low_string, recode_comments, recode_common_name, recode_decimal, recode_gravid,
    recode_scientific, recode_season, recode_sex,
};
pub use synonyms::Sex;
