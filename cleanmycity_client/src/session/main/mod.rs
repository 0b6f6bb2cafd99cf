mod manager;


pub(crate) use manager::SessionManager;
