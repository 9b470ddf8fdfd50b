//! Default value functions for serde deserialization and snapshot lookups.

pub fn minimum_turning_radius() -> f64 {
    0.4
}

pub fn non_straight_penalty() -> f64 {
    1.05
}

pub fn change_penalty() -> f64 {
    0.05
}

pub fn reverse_penalty() -> f64 {
    2.0
}

pub fn cost_penalty() -> f64 {
    2.0
}

pub fn analytic_expansion_ratio() -> f64 {
    3.5
}

pub fn analytic_expansion_max_length() -> f64 {
    3.0
}

pub fn smoother_tolerance() -> f64 {
    1e-10
}

pub fn smoother_max_iterations() -> usize {
    1000
}

pub fn w_data() -> f64 {
    0.2
}

pub fn w_smooth() -> f64 {
    0.3
}

pub fn enabled() -> bool {
    true
}
