pub mod offer_refresh;
