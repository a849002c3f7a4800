mod audio;
mod support;
mod time_label;
