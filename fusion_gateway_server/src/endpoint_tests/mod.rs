mod ipn;
mod orders;
