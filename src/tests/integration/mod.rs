mod round_trip_test;
