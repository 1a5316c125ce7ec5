// filters
/// Build a [`FilterSet`](crate::query::FilterSet) from `key => value` pairs.
#[macro_export]
macro_rules! filters {
    () => {
        $crate::query::FilterSet::new()
    };
    ( $( $key:expr => $value:expr ),+ $(,)? ) => {{
        let mut set = $crate::query::FilterSet::new();
        $( set.insert($key, $value); )+
        set
    }};
}
