pub mod file_operations;

pub use file_operations::{
    list_files_recursive, matches_target, read_text_file, rewrite_text_file, write_lines,
    write_text_file,
};
