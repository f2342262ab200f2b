#![cfg(test)]

mod sweep;
mod utils;
