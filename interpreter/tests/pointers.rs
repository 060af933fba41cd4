mod eloquence_test;
use eloquence_test::*;

eloquence_test!(pointer_write_reaches_the_target
"
val is 50
ptr is pointing to val
pointing from ptr is 100
"
  val == 100
);

eloquence_test!(pointer_read_follows_the_target
"
val is 7
ptr is pointing to val
out is pointing from ptr
val is 9
later is pointing from ptr
"
  out == 7
  later == 9
);

eloquence_test!(pointer_writes_reach_through_function_scopes
"
counter is 0
increment is takes(p) {
  pointing from p is (pointing from p) adds 1
}
increment(pointing to counter)
increment(pointing to counter)
increment(pointing to counter)
"
  counter == 3
);

eloquence_test!(pointer_bypasses_shadowing
"
x is 1
f is takes(p) {
  x is 99
  pointing from p is 42
  return x
}
shadowed is f(pointing to x)
"
  x == 42
  shadowed == 99
);

eloquence_test!(pointer_targets_the_nearest_binding
"
x is 1
make is takes() {
  x is 2
  return pointing to x
}
p is make()
pointing from p is 3
"
  x == 1
);

eloquence_test!(pointers_are_first_class
"
a is 10
holder is [pointing to a]
p is holder[0]
pointing from p is 20
"
  a == 20
);

eloquence_test!(pointing_to_unbound_identifier
  "ptr is pointing to missing"
  RuntimeError "identifier not found: missing"
);

eloquence_test!(can_only_point_to_identifier
  "ptr is pointing to 5"
  RuntimeError "can only point to identifier"
);

eloquence_test!(dereferencing_a_non_pointer
"
x is 5
pointing from x
"
  RuntimeError "cannot dereference non-pointer"
);

eloquence_test!(pointer_assignment_requires_a_pointer
"
x is 5
pointing from x is 6
"
  RuntimeError "'x' is not a pointer"
);

eloquence_test!(pointer_assignment_to_unbound_name
  "pointing from ghost is 1"
  RuntimeError "identifier not found: ghost"
);
