use alloy_sol_types::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface ITimelock {
        event QueueTransaction(
            bytes32 indexed txHash,
            address indexed target,
            uint256 value,
            string signature,
            bytes data,
            uint256 eta
        );

        event CancelTransaction(
            bytes32 indexed txHash,
            address indexed target,
            uint256 value,
            string signature,
            bytes data,
            uint256 eta
        );

        event ExecuteTransaction(
            bytes32 indexed txHash,
            address indexed target,
            uint256 value,
            string signature,
            bytes data,
            uint256 eta
        );
    }
}
