
mod file_picker_test;
