mod interaction;
mod surface;
mod view;
