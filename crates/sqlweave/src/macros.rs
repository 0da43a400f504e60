/// Invoke `$m!(A, B, ..; 0, 1, ..)` for tuples of arity 1 through 12.
macro_rules! tuple_impls {
    ($m:ident) => {
        $m!(A; 0);
        $m!(A, B; 0, 1);
        $m!(A, B, C; 0, 1, 2);
        $m!(A, B, C, D; 0, 1, 2, 3);
        $m!(A, B, C, D, E; 0, 1, 2, 3, 4);
        $m!(A, B, C, D, E, G; 0, 1, 2, 3, 4, 5);
        $m!(A, B, C, D, E, G, H; 0, 1, 2, 3, 4, 5, 6);
        $m!(A, B, C, D, E, G, H, I; 0, 1, 2, 3, 4, 5, 6, 7);
        $m!(A, B, C, D, E, G, H, I, J; 0, 1, 2, 3, 4, 5, 6, 7, 8);
        $m!(A, B, C, D, E, G, H, I, J, K; 0, 1, 2, 3, 4, 5, 6, 7, 8, 9);
        $m!(A, B, C, D, E, G, H, I, J, K, L; 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10);
        $m!(A, B, C, D, E, G, H, I, J, K, L, M; 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11);
    };
}

pub(crate) use tuple_impls;
