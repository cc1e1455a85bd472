pub mod locations;
pub mod onboarding;
pub mod profile;
