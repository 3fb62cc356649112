pub mod golfer;
