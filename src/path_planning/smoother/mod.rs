// Smoother configuration module

pub mod smoother_params;

pub use smoother_params::SmootherParams;
