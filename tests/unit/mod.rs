mod concurrency;
mod serialization;
