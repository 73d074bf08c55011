pub mod pair_list;
