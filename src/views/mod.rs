pub mod board_view;
