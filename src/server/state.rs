use crate::lookup::LookupResolver;

pub struct AppState {
    pub resolver: LookupResolver,
}
