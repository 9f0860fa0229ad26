//! Skill validation, score calibration, name extraction and ranking

pub mod candidate;
pub mod name_extractor;
pub mod ranker;
pub mod score_calibrator;
pub mod shortlister;
pub mod skill_validator;
