mod analytics;
mod issues;
mod organizations;
mod users;
