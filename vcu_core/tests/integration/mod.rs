pub mod common;

mod dual_qualification;
mod mode_transitions;
mod pwm_masking;
mod speed_truth_table;
mod vigilance_gates;
