//! Numeric building blocks for the m2048 analysis tools.
//!
//! This crate provides the small set of statistics the analysis commands are
//! built on:
//!
//! - **Smoothing**: valid-mode moving averages over bucketed curves
//! - **Descriptive statistics**: mean, median and sample standard deviation
//! - **Survival curves**: fraction of games still running at each progress value
//! - **Histograms**: equal-width frequency distributions
//! - **Regression**: least-squares line fits for scatter plots
//!
//! # Modules
//!
//! - [`smoothing`]: Moving-average smoothing
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`survival`]: Survival-rate step curves built from game endings
//! - [`histogram`]: Equal-width histogram construction
//! - [`regression`]: Ordinary least-squares line fitting
//!
//! # Examples
//!
//! ## Smoothing a curve
//!
//! ```
//! use m2048_stats::smoothing::moving_average;
//!
//! let smoothed = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
//! assert_eq!(smoothed, vec![2.0, 3.0, 4.0]);
//! ```
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use m2048_stats::descriptive::DescriptiveStats;
//!
//! let stats = DescriptiveStats::new([1.0, 2.0, 3.0, 4.0]).unwrap();
//! assert_eq!(stats.mean, 2.5);
//! assert_eq!(stats.median, 2.5);
//! ```
//!
//! ## Building a survival curve
//!
//! ```
//! use m2048_stats::survival::SurvivalCurve;
//!
//! // Progress values at which four games ended
//! let curve = SurvivalCurve::from_endings([1, 1, 2, 3], 10);
//! assert_eq!(curve.rate_at(0), 1.0);
//! assert_eq!(curve.rate_at(1), 0.5);
//! ```

pub mod descriptive;
pub mod histogram;
pub mod regression;
pub mod smoothing;
pub mod survival;
