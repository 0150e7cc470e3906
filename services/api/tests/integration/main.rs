mod catalog_test;
mod helpers;
mod router_test;
mod signup_test;
mod title_test;
mod token_test;
