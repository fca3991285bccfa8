pub mod common;

mod test_damage_band;
mod test_status_effects;
