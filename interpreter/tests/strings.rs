mod eloquence_test;
use eloquence_test::*;

eloquence_test!(concatenation_chains
"
greeting is \"Hello\" adds \", \" adds \"World\" adds \"!\"
"
  greeting == "Hello, World!"
);

eloquence_test!(escape_sequences_survive_evaluation
"
tabbed is \"a\\tb\"
quoted is \"say \\\"hi\\\"\"
slashed is \"back\\\\slash\"
"
  tabbed == "a\tb"
  quoted == "say \"hi\""
  slashed == "back\\slash"
);

eloquence_test!(strings_are_compared_by_contents
"
a is \"one\" adds \"two\"
b is \"onetwo\"
same is a equals b
"
  same == true
);

eloquence_test!(empty_string_is_truthy_but_empty
"
s is \"\"
n is count(s)
branch is if s { \"truthy\" } else { \"falsy\" }
"
  n == 0
  branch == "truthy"
);

eloquence_test!(count_measures_bytes
"
ascii is count(\"abc\")
accented is count(\"é\")
"
  ascii == 3
  accented == 2
);

eloquence_test!(char_literals_evaluate
"
c is 'x'
s is str(c)
"
  s == "x"
);

eloquence_test!(char_comparison_against_null
"
c is 'x'
isNone is c equals none
"
  isNone == false
);

eloquence_test!(string_keys_look_up_after_concatenation
"
m is { \"ab\": 1 }
key is \"a\" adds \"b\"
out is m[key]
"
  out == 1
);

eloquence_test!(building_text_from_pieces
"
words is [\"never\", \"odd\", \"or\", \"even\"]
line is join(words, \" \")
back is split(line, \" \")
n is count(back)
first is upper(back[0])
"
  line == "never odd or even"
  n == 4
  first == "NEVER"
);

eloquence_test!(str_of_a_string_is_identity
"
out is str(\"plain\")
"
  out == "plain"
);
