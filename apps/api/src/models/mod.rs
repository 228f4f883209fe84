// Request / response records. Nothing here outlives a single request.

pub mod email;
pub mod job_description;
pub mod scoring;
