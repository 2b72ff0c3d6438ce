pub mod uncross;
